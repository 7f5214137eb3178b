//! Application services for provider profiles.

mod directory;

pub use directory::{
    ProviderDirectoryError, ProviderDirectoryResult, ProviderDirectoryService,
    RegisterProviderRequest,
};
