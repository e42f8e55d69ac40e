/// First page of every paged catalog query.
pub const DEFAULT_PAGE: u32 = 1;

pub mod tmdb {

    pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

    pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

    pub const TOKEN_ENV_VAR: &str = "TMDB_API_TOKEN";
}

pub mod preferences {

    pub const FIRST_NAME: &str = "first_name";

    pub const LAST_NAME: &str = "last_name";

    pub const SESSION_USER_ID: &str = "session_user_id";
}

pub mod limits {

    /// Longest segment accepted in a document path.
    pub const MAX_PATH_SEGMENT_LEN: usize = 1500;

    pub const DEFAULT_CLI_PAGES: u32 = 1;
}
