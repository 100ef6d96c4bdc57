/// One-shot step decay: `base_lr` until `decay_epoch`, then
/// `base_lr * factor` for every remaining epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDecaySchedule {
    pub base_lr:     f64,
    pub decay_epoch: usize,
    pub factor:      f64,
}

impl StepDecaySchedule {
    pub fn new(base_lr: f64, decay_epoch: usize, factor: f64) -> Self {
        Self { base_lr, decay_epoch, factor }
    }

    /// Learning rate for a zero-based epoch index.
    pub fn learning_rate(&self, epoch: usize) -> f64 {
        if epoch >= self.decay_epoch {
            self.base_lr * self.factor
        } else {
            self.base_lr
        }
    }
}
