use crate::utils::error::{Result, TripPriceError};
use serde::{Deserialize, Serialize};

/// Gradient-boosted regression trees, exported from the training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub num_features: usize,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_left() -> bool {
    true
}

fn malformed(message: String) -> TripPriceError {
    TripPriceError::InferenceError { message }
}

impl Tree {
    /// 子節點索引一定大於父節點（已於載入時檢查），所以走訪必定終止；
    /// 未經檢查的樹若索引越界則回傳錯誤
    fn leaf_value(&self, row: &[f64]) -> Result<f64> {
        let mut index = 0;
        loop {
            let node = self
                .nodes
                .get(index)
                .ok_or_else(|| malformed(format!("node {} does not exist", index)))?;
            match node {
                Node::Leaf { leaf } => return Ok(*leaf),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = *row.get(*feature).ok_or_else(|| {
                        malformed(format!("node {} splits on missing feature {}", index, feature))
                    })?;
                    let next = if value.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if value < *threshold {
                        *left
                    } else {
                        *right
                    };
                    if next <= index {
                        return Err(malformed(format!(
                            "node {} points back to {}",
                            index, next
                        )));
                    }
                    index = next;
                }
            }
        }
    }

    fn validate(&self, num_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {} has a non-finite leaf value", index));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= num_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            index, feature, num_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} points to invalid child {}",
                                index, child
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl TreeEnsemble {
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.num_features {
            return Err(TripPriceError::InferenceError {
                message: format!(
                    "feature row has {} columns, model expects {}",
                    row.len(),
                    self.num_features
                ),
            });
        }

        let mut margin = 0.0;
        for tree in &self.trees {
            margin += tree.leaf_value(row)?;
        }
        let prediction = self.base_score + margin;

        if !prediction.is_finite() {
            return Err(TripPriceError::InferenceError {
                message: "model produced a non-finite prediction".to_string(),
            });
        }

        Ok(prediction)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.base_score.is_finite() {
            return Err("base_score must be finite".to_string());
        }
        if self.trees.is_empty() {
            return Err("model has no trees".to_string());
        }

        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.num_features)
                .map_err(|e| format!("tree {}: {}", index, e))?;
        }

        Ok(())
    }
}
