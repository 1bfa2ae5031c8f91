//! Core traits shared by the domain models

/// Primary key type used by the backend
pub type Id = i64;

/// Trait for entities that have a server-assigned identifier
pub trait Identifiable {
    fn id(&self) -> Id;

    fn has_id(&self, id: Id) -> bool {
        self.id() == id
    }
}

/// Find an entity by id in a slice
pub fn find_by_id<T: Identifiable>(items: &[T], id: Id) -> Option<&T> {
    items.iter().find(|item| item.has_id(id))
}

/// Find an entity by id in a slice, mutably
pub fn find_by_id_mut<T: Identifiable>(items: &mut [T], id: Id) -> Option<&mut T> {
    items.iter_mut().find(|item| item.has_id(id))
}
