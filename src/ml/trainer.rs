// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Per-student SGD on the masked reconstruction objective:
//
//   for epoch in 0..num_epochs:
//       lr = base_lr, or base_lr * decay_factor from lr_decay_epoch on
//       for each student (index order):
//           x    = zero-filled row, m = observed mask
//           out  = model(x)
//           loss = Σ m·(out − x)² + (λ/2)·weight_norm
//           θ    = θ − lr · ∇θ loss
//       train_loss = Σ per-student losses
//       valid_acc  = evaluate(model, zero-filled matrix, valid triples)
//
// The mask zeroes the error (and therefore the gradient) of
// every question the student never answered.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on the inner NdArray backend
//     for evaluation, with no autodiff graph
//
// Reference: Burn Book §5 (Custom Training Loop)

use anyhow::Result;
use burn::{
    backend::ndarray::NdArrayDevice,
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::{ResponseBatch, ResponseBatcher};
use crate::data::dataset::TrainingData;
use crate::domain::error::{ImputeError, ImputeResult};
use crate::domain::triple::TripleSet;
use crate::infra::metrics::{EpochMetrics, MetricsLogger, TrainingHistory};
use crate::ml::evaluator::{evaluate, validation_loss};
use crate::ml::model::AutoEncoder;

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Trained parameters plus the per-epoch record of the run.
pub struct TrainOutcome<B: Backend> {
    pub model:   AutoEncoder<B>,
    pub history: TrainingHistory,
}

/// Stop once validation loss fails to improve for more than `patience` epochs.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience:   usize,
    best:       f64,
    bad_epochs: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: f64::INFINITY, bad_epochs: 0 }
    }

    /// Record this epoch's validation loss; true means stop.
    pub fn should_stop(&mut self, valid_loss: f64) -> bool {
        if valid_loss < self.best {
            self.best       = valid_loss;
            self.bad_epochs = 0;
            false
        } else {
            self.bad_epochs += 1;
            self.bad_epochs > self.patience
        }
    }
}

/// Build a fresh model on the CPU backend and train it.
pub fn run_training(
    cfg:    &TrainConfig,
    data:   &TrainingData,
    valid:  &TripleSet,
    logger: Option<&MetricsLogger>,
) -> Result<TrainOutcome<TrainBackend>> {
    let device = NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);

    let model: AutoEncoder<TrainBackend> =
        cfg.model_config(data.num_questions()).init(&device);
    tracing::info!(
        "Model ready: {} questions -> k={} -> {} questions",
        data.num_questions(),
        cfg.hidden_size,
        data.num_questions(),
    );

    train_loop(model, cfg, data, valid, &device, logger)
}

pub fn train_loop<B: AutodiffBackend>(
    mut model: AutoEncoder<B>,
    cfg:       &TrainConfig,
    data:      &TrainingData,
    valid:     &TripleSet,
    device:    &B::Device,
    logger:    Option<&MetricsLogger>,
) -> Result<TrainOutcome<B>> {
    let schedule    = cfg.schedule();
    let batcher     = ResponseBatcher::<B>::new(device.clone());
    let mut optim   = SgdConfig::new().init::<B, AutoEncoder<B>>();
    let mut history = TrainingHistory::default();
    let mut stopper = cfg.early_stopping_patience.map(EarlyStopping::new);

    for epoch in 0..cfg.num_epochs {
        let lr = schedule.learning_rate(epoch);
        if epoch == schedule.decay_epoch {
            tracing::info!("Learning rate decayed to {:.6}", lr);
        }

        let (trained, train_loss) =
            train_epoch(model, &mut optim, &batcher, data, cfg.lambda, lr, epoch)?;
        model = trained;

        // Inner-backend copy: no autodiff graph during evaluation
        let model_valid = model.valid();
        let valid_acc   = evaluate(&model_valid, data.zero_filled(), valid)?;
        let valid_loss  = match stopper {
            Some(_) => Some(validation_loss(&model_valid, data.zero_filled(), valid, cfg.lambda)?),
            None    => None,
        };

        let metrics = EpochMetrics::new(epoch, lr, train_loss, valid_acc)
            .with_valid_loss(valid_loss);
        tracing::info!(
            "Epoch {:>3}/{} | lr={:.5} | train_loss={:.6} | valid_acc={:.4}",
            epoch, cfg.num_epochs, lr, train_loss, valid_acc,
        );
        if let Some(logger) = logger {
            logger.log(&metrics)?;
        }
        history.push(metrics);

        if let (Some(stopper), Some(loss)) = (stopper.as_mut(), valid_loss) {
            if stopper.should_stop(loss) {
                tracing::warn!("Early stopping after epoch {} (valid_loss={:.6})", epoch, loss);
                break;
            }
        }
    }

    if let Some(acc) = history.final_valid_acc() {
        tracing::info!("Final validation accuracy: {:.4}", acc);
    }
    Ok(TrainOutcome { model, history })
}

/// One pass over every student. Returns the updated model and Σ loss.
pub fn train_epoch<B, O>(
    mut model: AutoEncoder<B>,
    optim:     &mut O,
    batcher:   &ResponseBatcher<B>,
    data:      &TrainingData,
    lambda:    f64,
    lr:        f64,
    epoch:     usize,
) -> ImputeResult<(AutoEncoder<B>, f64)>
where
    B: AutodiffBackend,
    O: Optimizer<AutoEncoder<B>, B>,
{
    let mut epoch_loss = 0.0f64;

    for row in data.iter() {
        let user_id = row.user_id;
        let batch   = batcher.batch(vec![row]);

        let (stepped, loss) = sgd_step(model, optim, &batch, lambda, lr);
        if !loss.is_finite() {
            return Err(ImputeError::NumericInstability { epoch, user_id });
        }
        model = stepped;
        epoch_loss += loss;
    }

    Ok((model, epoch_loss))
}

/// Forward, backward and one SGD update on a single batch.
/// A non-finite loss is returned without touching the parameters.
pub fn sgd_step<B, O>(
    model:  AutoEncoder<B>,
    optim:  &mut O,
    batch:  &ResponseBatch<B>,
    lambda: f64,
    lr:     f64,
) -> (AutoEncoder<B>, f64)
where
    B: AutodiffBackend,
    O: Optimizer<AutoEncoder<B>, B>,
{
    let loss       = user_loss(&model, batch, lambda);
    let loss_value = loss.clone().into_scalar().elem::<f64>();
    if !loss_value.is_finite() {
        return (model, loss_value);
    }

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    (optim.step(lr, model, grads), loss_value)
}

/// Σ mask·(reconstruction − target)².
pub fn masked_reconstruction_loss<B: Backend>(
    reconstruction: Tensor<B, 2>,
    target:         Tensor<B, 2>,
    mask:           Tensor<B, 2>,
) -> Tensor<B, 1> {
    ((reconstruction - target) * mask).powf_scalar(2.0).sum()
}

/// Masked reconstruction error of the batch plus (λ/2)·weight_norm.
pub fn user_loss<B: Backend>(
    model:  &AutoEncoder<B>,
    batch:  &ResponseBatch<B>,
    lambda: f64,
) -> Tensor<B, 1> {
    let reconstruction = model.forward(batch.inputs.clone());
    masked_reconstruction_loss(reconstruction, batch.inputs.clone(), batch.mask.clone())
        + model.weight_norm().mul_scalar(lambda / 2.0)
}
