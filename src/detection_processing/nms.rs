use crate::common::{BvrBox, NmsMode};

/// Anything that can take part in non-maximum suppression.
pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
    fn class_id(&self) -> isize;
}

impl Nms for BvrBox {
    /// Computes the intersection over union (IoU) between this bounding box and another.
    fn iou(&self, other: &Self) -> f32 {
        BvrBox::iou(self, other)
    }

    /// Returns the confidence score of the bounding box.
    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn class_id(&self) -> isize {
        self.class_id
    }
}

/// Greedy NMS in place.
///
/// Boxes are stable-sorted by descending confidence, so ties keep their input order.
/// A box is dropped when some already-kept box overlaps it with `iou > iou_threshold`;
/// a box sitting exactly on the threshold survives. In [`NmsMode::ClassAware`] only a
/// kept box of the same class can drop it. Survivors are left in acceptance order.
///
/// Every box is compared with every kept box, so the cost is O(n²). Fine for per-frame
/// detection counts, not for very dense scenes.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32, mode: NmsMode) {
    boxes.sort_by(|b1, b2| sort_key(b2.confidence()).total_cmp(&sort_key(b1.confidence())));

    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            if mode == NmsMode::ClassAware && boxes[prev_index].class_id() != boxes[index].class_id() {
                continue;
            }
            if boxes[prev_index].iou(&boxes[index]) > iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}

/// `total_cmp` orders `-0.0` below `0.0`; fold it so equal scores stay in input order.
fn sort_key(confidence: f32) -> f32 {
    if confidence == 0.0 {
        0.0
    } else {
        confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_boxes() -> Vec<BvrBox> {
        vec![
            BvrBox::new(10., 20., 50., 80., 0.95, 1),
            BvrBox::new(15., 25., 55., 85., 0.90, 1),
            BvrBox::new(100., 100., 150., 150., 0.85, 1),
            BvrBox::new(105., 105., 155., 155., 0.80, 1),
        ]
    }

    #[test]
    fn keeps_best_of_each_cluster() {
        let mut boxes = four_boxes();
        nms(&mut boxes, 0.5, NmsMode::Global);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].confidence, 0.95);
        assert_eq!(boxes[1].confidence, 0.85);
    }

    #[test]
    fn sorts_unordered_input() {
        let mut boxes = four_boxes();
        boxes.reverse();
        nms(&mut boxes, 0.5, NmsMode::Global);
        let confs: Vec<f32> = boxes.iter().map(|b| b.confidence).collect();
        assert_eq!(confs, vec![0.95, 0.85]);
    }

    #[test]
    fn swap_keeps_acceptance_order() {
        // The swap trick must not reorder survivors that are interleaved with dropped boxes.
        let mut boxes = vec![
            BvrBox::new(0., 0., 10., 10., 0.9, 0),
            BvrBox::new(0., 0., 10., 10., 0.8, 0),
            BvrBox::new(50., 50., 60., 60., 0.7, 0),
            BvrBox::new(50., 50., 60., 60., 0.6, 0),
            BvrBox::new(90., 90., 99., 99., 0.5, 0),
        ];
        nms(&mut boxes, 0.5, NmsMode::Global);
        let confs: Vec<f32> = boxes.iter().map(|b| b.confidence).collect();
        assert_eq!(confs, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn class_aware_spares_other_classes() {
        let mut boxes = vec![
            BvrBox::new(0., 0., 10., 10., 0.9, 0),
            BvrBox::new(0., 0., 10., 10., 0.8, 1),
            BvrBox::new(0., 0., 10., 10., 0.7, 0),
        ];
        let mut global = boxes.clone();
        nms(&mut global, 0.5, NmsMode::Global);
        assert_eq!(global.len(), 1);

        nms(&mut boxes, 0.5, NmsMode::ClassAware);
        assert_eq!(boxes.len(), 2);
        assert_eq!((boxes[0].class_id, boxes[1].class_id), (0, 1));
    }

    #[test]
    fn signed_zero_scores_tie() {
        let mut boxes = vec![
            BvrBox::new(0., 0., 10., 10., -0.0, 3),
            BvrBox::new(20., 0., 30., 10., 0.0, 4),
            BvrBox::new(40., 0., 50., 10., -0.0, 5),
        ];
        nms(&mut boxes, 0.5, NmsMode::Global);
        let classes: Vec<isize> = boxes.iter().map(|b| b.class_id).collect();
        assert_eq!(classes, vec![3, 4, 5]);

        // Of two identical zero-score boxes the first one wins, whatever its sign.
        let mut overlapping = vec![
            BvrBox::new(0., 0., 10., 10., -0.0, 1),
            BvrBox::new(0., 0., 10., 10., 0.0, 2),
        ];
        nms(&mut overlapping, 0.5, NmsMode::Global);
        assert_eq!(overlapping.len(), 1);
        assert_eq!(overlapping[0].class_id, 1);
    }
}
