//! Client-side ids for draft steps and new policies.

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
