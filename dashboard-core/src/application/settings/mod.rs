//! Settings use cases

pub mod use_cases;

pub use use_cases::{
    UpdateApplicationSettingsUseCase, UpdateGroupSettingsUseCase, UpdateSiteSettingsUseCase,
    UpdateUserUseCase,
};
