//! One struct per operation, each wrapping a repository call plus light
//! transformation. Use cases hold no state beyond the repository handle and
//! propagate repository errors unmodified.

mod instance;
mod metadata;
mod users;

pub use instance::{GetInstanceLocalesUseCase, GetInstanceVersionUseCase};
pub use metadata::ListMetadataUseCase;
pub use users::{
    CopyInUserUseCase, GetCurrentUserUseCase, GetUserByIdUseCase, GetUsersByIdsUseCase,
    ListAllUserIdsUseCase, ListUsersUseCase, SaveUserStatusUseCase, SaveUsersUseCase,
    UpdateGroupsUseCase, UpdateRolesUseCase,
};
