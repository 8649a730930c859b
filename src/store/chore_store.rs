use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::{
    store::{
        backend::KeyValueStore,
        entities::{Chore, Frequency},
    },
    utils::{clock::Clock, time::truncate_to_millis},
};

/// Key the whole chore list is persisted under.
pub const CHORES_KEY: &str = "chores";

/// Single source of truth for the chore collection. The full list is kept in memory and
/// written through to the backend as one JSON document on every mutation.
///
/// Mutations take `&mut self`, so overlapping writes through one store can't compile.
/// Each mutation re-reads the persisted list, applies its change and writes the result
/// back before the in-memory copy is replaced. A failed write therefore never leaves
/// memory ahead of the backend, and writes that happened through another handle are
/// picked up instead of clobbered.
pub struct ChoreStore<S: KeyValueStore> {
    backend: S,
    clock: Box<dyn Clock>,
    chores: Vec<Chore>,
}

impl<S: KeyValueStore> ChoreStore<S> {
    pub fn new(backend: S, clock: Box<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            chores: Vec::new(),
        }
    }

    /// Reads the persisted list into memory. A backend that was never written to yields an
    /// empty list, a backend holding something unparseable is an error.
    pub async fn load(&mut self) -> Result<&[Chore]> {
        self.chores = self.fetch().await?;
        Ok(&self.chores)
    }

    pub fn chores(&self) -> &[Chore] {
        &self.chores
    }

    /// Creates a chore with a fresh id and no completion yet, and persists the extended
    /// list. Names that are empty after trimming are rejected before anything is written.
    pub async fn add(&mut self, name: &str, frequency: Frequency) -> Result<Chore> {
        if name.trim().is_empty() {
            bail!("Chore name can't be empty");
        }

        let mut chores = self.fetch().await?;
        let chore = Chore {
            id: self.next_id(&chores),
            name: name.to_string(),
            frequency,
            last_completed: None,
        };
        chores.push(chore.clone());
        self.persist(&chores).await?;
        self.chores = chores;

        Ok(chore)
    }

    /// Marks the chore as completed at the current clock instant. Everything except
    /// `last_completed` stays untouched. An unknown id is a no-op, though the list is
    /// still written back like for any other mutation.
    pub async fn complete(&mut self, id: &str) -> Result<&[Chore]> {
        let mut chores = self.fetch().await?;
        match chores.iter_mut().find(|v| v.id == id) {
            Some(chore) => chore.last_completed = Some(truncate_to_millis(self.clock.time())),
            None => debug!("No chore with id {id} to complete"),
        }
        self.persist(&chores).await?;
        self.chores = chores;

        Ok(&self.chores)
    }

    /// Removes the chore with the given id. An unknown id is a no-op.
    pub async fn remove(&mut self, id: &str) -> Result<&[Chore]> {
        let mut chores = self.fetch().await?;
        let count = chores.len();
        chores.retain(|v| v.id != id);
        if chores.len() == count {
            debug!("No chore with id {id} to remove");
        }
        self.persist(&chores).await?;
        self.chores = chores;

        Ok(&self.chores)
    }

    async fn fetch(&self) -> Result<Vec<Chore>> {
        match self.backend.get(CHORES_KEY).await? {
            Some(value) => serde_json::from_str(&value)
                .with_context(|| format!("Stored chore list under {CHORES_KEY:?} is corrupted")),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, chores: &[Chore]) -> Result<()> {
        let value = serde_json::to_string(chores)?;
        self.backend.set(CHORES_KEY, &value).await
    }

    /// Ids come from the creation-time clock reading in milliseconds. Additions within the
    /// same millisecond bump past taken values, so ids stay unique.
    fn next_id(&self, chores: &[Chore]) -> String {
        let mut millis = self.clock.time().timestamp_millis();
        while chores.iter().any(|v| v.id == millis.to_string()) {
            millis += 1;
        }
        millis.to_string()
    }
}
