//! SinNode: elementwise sine (the "function" node).

/// Applies `sin(x)` to every element. Takes no options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinNode;

impl SinNode {
    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|x| x.sin()).collect()
    }
}
