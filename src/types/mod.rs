// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Names are checked on construction; ids are opaque service values.

mod id;
mod stack_name;

pub use id::StackId;
pub use stack_name::{StackName, StackNameError};
