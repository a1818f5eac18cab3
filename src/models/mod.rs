pub mod auth;
pub mod vm;

pub use auth::LoginForm;
pub use vm::NormalizedVm;
