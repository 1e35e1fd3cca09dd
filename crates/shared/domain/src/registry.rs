//! Type-erased registry entries for initialized feature slices.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Feature state that can live in the shared API state.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A slice ready for registration, keyed by its concrete type.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    /// Concrete type name, for startup logs and missing-slice errors.
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), state: Box::new(state) }
    }

    /// Borrows the state as `T` when the slice holds that type.
    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
