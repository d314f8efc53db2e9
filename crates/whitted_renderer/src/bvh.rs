//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built top-down over a scene's objects. Leaves hold the index
//! of one object in the scene's object list, so the tree never reorders or
//! owns the objects themselves and hit records name the same object whichever
//! way the scene is traced.

use crate::{HitRecord, Hittable, RenderError, RenderResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use whitted_math::{Aabb, Interval, Ray, Vec3};

/// How the split axis is chosen at each level of the build.
///
/// Only traversal cost depends on this choice; the closest hit found for any
/// ray is the same under every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitAxis {
    /// Longest axis of the span's centroid bounds.
    #[default]
    Longest,
    /// Uniformly random axis per node, reproducible from the seed.
    Random { seed: u64 },
    /// Always the given axis (0=X, 1=Y, 2=Z).
    Fixed(usize),
}

/// BVH node - either a branch with two children or a leaf with one object.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf referring to a single object by index.
    Leaf { object: usize, bbox: Aabb },
}

/// A built hierarchy plus its statistics.
pub struct Bvh {
    root: BvhNode,
    node_count: usize,
    depth: usize,
}

struct AxisChooser {
    policy: SplitAxis,
    rng: Option<StdRng>,
}

impl AxisChooser {
    fn new(policy: SplitAxis) -> Self {
        let rng = match policy {
            SplitAxis::Random { seed } => Some(StdRng::seed_from_u64(seed)),
            _ => None,
        };
        Self { policy, rng }
    }

    fn choose(&mut self, span: &[usize], boxes: &[Aabb]) -> usize {
        match (self.policy, self.rng.as_mut()) {
            (SplitAxis::Random { .. }, Some(rng)) => rng.gen_range(0..3),
            (SplitAxis::Fixed(axis), _) => axis.min(2),
            _ => {
                let centroid_bounds = span.iter().fold(Aabb::EMPTY, |acc, &i| {
                    let c = boxes[i].centroid();
                    Aabb::surrounding(&acc, &Aabb::from_points(c, c))
                });
                centroid_bounds.longest_axis()
            }
        }
    }
}

#[inline]
fn centroid_on(bbox: &Aabb, axis: usize) -> f32 {
    let c: Vec3 = bbox.centroid();
    c[axis]
}

impl Bvh {
    /// Build a hierarchy over `objects`.
    ///
    /// Fails with [`RenderError::EmptyScene`] when there is nothing to build over.
    pub fn build(objects: &[Box<dyn Hittable>], split: SplitAxis) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let boxes: Vec<Aabb> = objects.iter().map(|o| o.bounding_box()).collect();
        let mut indices: Vec<usize> = (0..objects.len()).collect();
        let mut chooser = AxisChooser::new(split);

        let root = BvhNode::build(&mut indices, &boxes, &mut chooser);
        let bvh = Self {
            node_count: root.node_count(),
            depth: root.depth(),
            root,
        };

        log::info!(
            "Built BVH ({:?}) over {} objects: {} nodes, depth {}",
            split,
            objects.len(),
            bvh.node_count,
            bvh.depth
        );

        Ok(bvh)
    }

    /// Closest hit among `objects` within `ray_t`.
    ///
    /// `objects` must be the slice the hierarchy was built over. Ties on `t`
    /// go to the lower object index, whatever the tree shape.
    pub fn hit(
        &self,
        objects: &[Box<dyn Hittable>],
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord,
    ) -> bool {
        let mut closest = None;
        self.root.hit(objects, ray, ray_t, &mut closest);

        match closest {
            Some(hit) => {
                *rec = hit;
                true
            }
            None => false,
        }
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn bounding_box(&self) -> Aabb {
        self.root.bounding_box()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl BvhNode {
    /// Recursive median split over `span`, which is reordered in place.
    fn build(span: &mut [usize], boxes: &[Aabb], chooser: &mut AxisChooser) -> Self {
        if span.len() == 1 {
            let object = span[0];
            return BvhNode::Leaf {
                object,
                bbox: boxes[object],
            };
        }

        let axis = chooser.choose(span, boxes);

        let (left, right) = if span.len() == 2 {
            let (a, b) = (span[0], span[1]);
            let (first, second) =
                if centroid_on(&boxes[a], axis) < centroid_on(&boxes[b], axis) {
                    (a, b)
                } else {
                    (b, a)
                };
            (
                BvhNode::Leaf {
                    object: first,
                    bbox: boxes[first],
                },
                BvhNode::Leaf {
                    object: second,
                    bbox: boxes[second],
                },
            )
        } else {
            span.sort_unstable_by(|&a, &b| {
                centroid_on(&boxes[a], axis)
                    .partial_cmp(&centroid_on(&boxes[b], axis))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mid = span.len() / 2;
            let (lower, upper) = span.split_at_mut(mid);
            (
                Self::build(lower, boxes, chooser),
                Self::build(upper, boxes, chooser),
            )
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Fold this subtree's hits into `closest`.
    ///
    /// The search is narrowed to the closest hit so far, inclusively, so a
    /// hit at the same `t` still reaches the tie-break.
    fn hit(
        &self,
        objects: &[Box<dyn Hittable>],
        ray: &Ray,
        ray_t: Interval,
        closest: &mut Option<HitRecord>,
    ) {
        let search = match *closest {
            Some(best) => ray_t.with_max(best.t),
            None => ray_t,
        };

        match self {
            BvhNode::Leaf { object, .. } => {
                let mut rec = HitRecord::default();
                if !objects[*object].hit(ray, search, &mut rec) {
                    return;
                }
                rec.object = *object;

                if closest.map_or(true, |best| rec.is_closer_than(&best)) {
                    *closest = Some(rec);
                }
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, search) {
                    return;
                }

                left.hit(objects, ray, ray_t, closest);
                right.hit(objects, ray, ray_t, closest);
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}
