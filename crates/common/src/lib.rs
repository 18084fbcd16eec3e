//! Shared building blocks for the recipe hub crates: logging bootstrap,
//! response types and human-friendly time formatting.

pub mod time;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
