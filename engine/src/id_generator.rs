use rand::Rng;

use crate::identifiers::EntryId;

pub fn generate_entry_id() -> EntryId {
    let value: u64 = rand::rng().random();
    EntryId::new(format!("{:016x}", value))
}
