use crate::value_objects::snapshot::FormSnapshot;

pub trait SnapshotStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<FormSnapshot>, String>;
    fn save(&self, snapshot: &FormSnapshot) -> Result<(), String>;
}
