mod company;
mod job;
mod user;

pub use company::Company;
pub use job::{Job, NewJob};
pub use user::{NewUser, User, UserCredentials};
