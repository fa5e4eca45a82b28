//! Selection Store
//!
//! Ordered editor selection with an active object and a change counter

use crate::scene::ObjectId;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    objects: Vec<ObjectId>,
    active: Option<ObjectId>,
    generation: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// The active object, falling back to the first selected object
    pub fn active(&self) -> Option<ObjectId> {
        self.active.or_else(|| self.objects.first().copied())
    }

    /// Bumped on every change so observers can detect stale captures
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Replace the selection. Duplicates are dropped, order is kept.
    pub fn set(&mut self, objects: impl IntoIterator<Item = ObjectId>, active: Option<ObjectId>) {
        self.objects.clear();
        for id in objects {
            if !self.objects.contains(&id) {
                self.objects.push(id);
            }
        }
        self.active = active.filter(|id| self.objects.contains(id));
        self.generation += 1;
    }

    pub fn add(&mut self, id: ObjectId) {
        if !self.objects.contains(&id) {
            self.objects.push(id);
            self.generation += 1;
        }
    }

    pub fn remove(&mut self, id: ObjectId) {
        let before = self.objects.len();
        self.objects.retain(|o| *o != id);
        if self.active == Some(id) {
            self.active = None;
        }
        if self.objects.len() != before {
            self.generation += 1;
        }
    }

    pub fn clear(&mut self) {
        if !self.objects.is_empty() || self.active.is_some() {
            self.objects.clear();
            self.active = None;
            self.generation += 1;
        }
    }
}
