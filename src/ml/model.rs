use burn::{
    module::Param,
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation::sigmoid, TensorData},
};
use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct AutoEncoderConfig {
    pub num_questions: usize,
    pub hidden_size:   usize,
    #[config(default = 0)]
    pub seed:          u64,
}

impl AutoEncoderConfig {
    /// Build the three layers with seeded uniform(±1/√fan_in) weights and biases.
    pub fn init<B: Backend>(&self, device: &B::Device) -> AutoEncoder<B> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let encode = seeded_linear(self.num_questions, self.hidden_size, &mut rng, device);
        let hidden = seeded_linear(self.hidden_size, self.hidden_size, &mut rng, device);
        let decode = seeded_linear(self.hidden_size, self.num_questions, &mut rng, device);
        AutoEncoder { encode, hidden, decode }
    }
}

fn seeded_linear<B: Backend, R: Rng>(
    d_input:  usize,
    d_output: usize,
    rng:      &mut R,
    device:   &B::Device,
) -> Linear<B> {
    let bound = 1.0 / (d_input.max(1) as f32).sqrt();
    let dist  = Uniform::new_inclusive(-bound, bound);

    let weight: Vec<f32> = (0..d_input * d_output).map(|_| rng.sample(dist)).collect();
    let bias:   Vec<f32> = (0..d_output).map(|_| rng.sample(dist)).collect();

    // Burn stores Linear weights as [d_input, d_output]
    let mut linear = LinearConfig::new(d_input, d_output).init(device);
    linear.weight = Param::from_tensor(Tensor::from_data(
        TensorData::new(weight, [d_input, d_output]),
        device,
    ));
    linear.bias = Some(Param::from_tensor(Tensor::from_data(
        TensorData::new(bias, [d_output]),
        device,
    )));
    linear
}

/// Three sigmoid layers: questions → k → k → questions.
#[derive(Module, Debug)]
pub struct AutoEncoder<B: Backend> {
    pub encode: Linear<B>,
    pub hidden: Linear<B>,
    pub decode: Linear<B>,
}

impl<B: Backend> AutoEncoder<B> {
    /// inputs: [batch, num_questions] → reconstruction in (0,1): [batch, num_questions]
    pub fn forward(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = sigmoid(self.encode.forward(inputs));
        let x = sigmoid(self.hidden.forward(x));
        sigmoid(self.decode.forward(x))
    }

    /// ‖W_encode‖² + ‖W_hidden‖² + ‖W_decode‖² (Frobenius, biases excluded).
    pub fn weight_norm(&self) -> Tensor<B, 1> {
        squared_norm(self.encode.weight.val())
            + squared_norm(self.hidden.weight.val())
            + squared_norm(self.decode.weight.val())
    }

    pub fn num_questions(&self) -> usize {
        self.encode.weight.val().dims()[0]
    }

    pub fn hidden_size(&self) -> usize {
        self.encode.weight.val().dims()[1]
    }
}

fn squared_norm<B: Backend>(weight: Tensor<B, 2>) -> Tensor<B, 1> {
    weight.powf_scalar(2.0).sum()
}
