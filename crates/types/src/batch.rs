use crate::{Address, RecipientRecord};

/// Consecutive recipients submitted together as one atomic unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    index: usize,
    first_position: usize,
    members: Vec<RecipientRecord>,
}

impl Batch {
    /// `first_position` is the position of the first member in the eligible
    /// list
    pub fn new(index: usize, first_position: usize, members: Vec<RecipientRecord>) -> Self {
        Self {
            index,
            first_position,
            members,
        }
    }

    /// Position of this batch in the run, starting at 0
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn members(&self) -> &[RecipientRecord] {
        &self.members
    }

    pub fn into_members(self) -> Vec<RecipientRecord> {
        self.members
    }

    pub fn recipients(&self) -> impl Iterator<Item = &Address> {
        self.members.iter().map(|m| &m.owner)
    }

    /// Members paired with their position in the eligible list
    pub fn positioned(&self) -> impl Iterator<Item = (usize, &Address)> {
        self.recipients()
            .enumerate()
            .map(move |(offset, recipient)| (self.first_position + offset, recipient))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
