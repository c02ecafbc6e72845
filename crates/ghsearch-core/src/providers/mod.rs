// Fetch collaborators: GitHub search endpoints and the trending page
pub mod github;
pub mod trending;

pub use github::{CodeSearch, RepositorySearch};
pub use trending::TrendingSource;
