extern crate serde;
#[macro_use]
extern crate serde_derive;

/// A remote JSON endpoint living under the `/_services/json/` namespace.
///
/// Implemented by response payload types, so that a call site only names
/// the type it expects and the identifier comes with it.
pub trait Service {
    fn identifier() -> &'static str;
}

macro_rules! service {
    ($id:expr => $ep:ty) => {
        impl crate::Service for $ep {
            fn identifier() -> &'static str {
                $id
            }
        }
    };
}

pub mod catalogs;
pub mod comments;
pub mod tags;
