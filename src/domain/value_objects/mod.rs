mod company_handle;
mod field_value;
mod filter_spec;
mod update_payload;
mod username;

pub use company_handle::CompanyHandle;
pub use field_value::FieldValue;
pub use filter_spec::FilterSpec;
pub use update_payload::UpdatePayload;
pub use username::Username;
