//! # Table
//!
//! One in-memory collection plus the allocator that numbers it.
//!
//! ```text
//!   Table<Customer>
//!   ┌────────────────────────────────────────────┐
//!   │ rows: [CUST001, CUST002, CUST003]          │   insertion order kept
//!   │ ids:  IdAllocator { high_water: 3 }        │   next insert gets 4
//!   └────────────────────────────────────────────┘
//! ```

use handset_core::{Entity, EntityId, IdAllocator};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct Table<T: Entity> {
    rows: Vec<T>,
    ids: IdAllocator,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: Vec::new(),
            ids: IdAllocator::default(),
        }
    }
}

impl<T: Entity> Table<T> {
    /// Builds a table from seed rows. Ids must be positive and unique.
    pub fn seeded(rows: Vec<T>) -> StoreResult<Self> {
        let mut ids = IdAllocator::default();
        let mut seen = std::collections::HashSet::with_capacity(rows.len());

        for row in &rows {
            let id = row.id();
            if id == 0 {
                return Err(StoreError::Fixture {
                    name: T::KIND.to_string(),
                    reason: "ids must be positive".to_string(),
                });
            }
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId { entity: T::KIND, id });
            }
            ids.observe(id);
        }

        Ok(Table { rows, ids })
    }

    pub fn all(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a row or fails with `NotFound`.
    pub fn require(&self, id: EntityId) -> StoreResult<&T> {
        self.get(id).ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    pub fn require_mut(&mut self, id: EntityId) -> StoreResult<&mut T> {
        self.get_mut(id).ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    /// The id the next insert will receive.
    pub fn next_id(&self) -> EntityId {
        self.ids.peek()
    }

    /// Inserts a row built from a freshly allocated id.
    pub fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> &T {
        let id = self.ids.next_id();
        self.rows.push(build(id));
        let last = self.rows.len() - 1;
        &self.rows[last]
    }

    /// Replaces a row with an updated copy.
    pub fn replace(&mut self, row: T) -> StoreResult<()> {
        let slot = self.require_mut(row.id())?;
        *slot = row;
        Ok(())
    }

    /// Removes a row. Its id is not reused.
    pub fn remove(&mut self, id: EntityId) -> StoreResult<T> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;
        Ok(self.rows.remove(index))
    }
}
