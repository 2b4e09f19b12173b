use candle_core::{Result, Tensor};
use candle_nn::{Activation, Linear, Module, VarBuilder};

/// Layers applied in order, each optionally followed by an activation
pub struct StackLayers<M: Module> {
    layers: Vec<(M, Option<Activation>)>,
}

impl<M: Module> Module for StackLayers<M> {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        self.layers.iter().try_fold(input.clone(), |h, (layer, act)| {
            let h = layer.forward(&h)?;
            match act {
                Some(act) => act.forward(&h),
                None => Ok(h),
            }
        })
    }
}

impl<M: Module> StackLayers<M> {
    pub fn new() -> Self {
        Self { layers: vec![] }
    }

    pub fn push_with_act(&mut self, layer: M, activation: Activation) {
        self.layers.push((layer, Some(activation)));
    }

    pub fn push(&mut self, layer: M) {
        self.layers.push((layer, None));
    }
}

impl<M: Module> Default for StackLayers<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fully connected ReLU layers `in_dim -> layers[0] -> ... -> layers[L-1]`
///
/// Variables are named `{prefix}.{j}.weight` and `{prefix}.{j}.bias`.
///
/// Returns the stack and the output dimension (`in_dim` if `layers`
/// is empty)
pub fn relu_stack(
    in_dim: usize,
    layers: &[usize],
    prefix: &str,
    vs: &VarBuilder,
) -> Result<(StackLayers<Linear>, usize)> {
    let mut stack = StackLayers::new();
    let mut d_in = in_dim;
    for (j, &d_out) in layers.iter().enumerate() {
        let linear = candle_nn::linear(d_in, d_out, vs.pp(format!("{}.{}", prefix, j)))?;
        stack.push_with_act(linear, Activation::Relu);
        d_in = d_out;
    }
    Ok((stack, d_in))
}
