/*!
 * String Registry
 * Writer-local deduplication of string values into dense integer ids
 */

mod string_registry;

pub use string_registry::{RegistryListener, StringRegistry};
