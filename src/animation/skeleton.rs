use glam::{Mat4, Quat, Vec3};

/// Local translation / rotation / scale of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: NodeTransform = NodeTransform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Local transforms for every node of a skeleton at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub locals: Vec<NodeTransform>,
}

/// Node hierarchy of a model: parent links plus the rest (bind) transforms
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    pub parents: Vec<Option<usize>>,
    pub rest: Vec<NodeTransform>,
}

impl Skeleton {
    pub fn new(parents: Vec<Option<usize>>, rest: Vec<NodeTransform>) -> Self {
        debug_assert_eq!(parents.len(), rest.len());
        Self { parents, rest }
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Pose with every node at its rest transform
    pub fn rest_pose(&self) -> Pose {
        Pose {
            locals: self.rest.clone(),
        }
    }

    /// Model-space matrix of every node for `pose`.
    ///
    /// Parents may appear after their children in node order, so globals are
    /// resolved by walking up to the nearest resolved ancestor.
    pub fn globals(&self, pose: &Pose) -> Vec<Mat4> {
        let n = self.len().min(pose.locals.len());
        let mut globals: Vec<Option<Mat4>> = vec![None; n];
        let mut chain = Vec::new();

        for node in 0..n {
            if globals[node].is_some() {
                continue;
            }
            // Collect the unresolved ancestry, then resolve it top-down
            chain.clear();
            let mut cursor = Some(node);
            while let Some(i) = cursor {
                if i >= n || globals[i].is_some() || chain.len() > n {
                    break;
                }
                chain.push(i);
                cursor = self.parents[i];
            }
            let mut parent = cursor
                .filter(|&p| p < n)
                .and_then(|p| globals[p])
                .unwrap_or(Mat4::IDENTITY);
            for &i in chain.iter().rev() {
                let m = parent * pose.locals[i].matrix();
                globals[i] = Some(m);
                parent = m;
            }
        }

        globals.into_iter().map(|m| m.unwrap_or(Mat4::IDENTITY)).collect()
    }
}
