use std::num::NonZeroUsize;

use airdrop_types::{Batch, RecipientRecord};

/// Split recipients into consecutive batches of at most `batch_size`.
///
/// Only the last batch may be smaller. Flattening the batches gives back
/// the input.
pub fn batch_recipients(recipients: Vec<RecipientRecord>, batch_size: NonZeroUsize) -> Vec<Batch> {
    let size = batch_size.get();
    let mut batches = Vec::with_capacity(recipients.len().div_ceil(size));
    let mut remaining = recipients.into_iter().peekable();

    while remaining.peek().is_some() {
        let members: Vec<RecipientRecord> = remaining.by_ref().take(size).collect();
        let first_position = batches.len() * size;
        batches.push(Batch::new(batches.len(), first_position, members));
    }

    batches
}
