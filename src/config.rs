use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    /// Refresh token from a prior authorization-code grant. Login fails
    /// without one; visit /authorize to start a new grant.
    pub spotify_refresh_token: Option<String>,
    pub openai_api_key: String,
    pub openai_model: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let spotify_client_id = env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("SPOTIFY_CLIENT_ID environment variable must be set"))?;
        let spotify_client_secret = env::var("SPOTIFY_CLIENT_SECRET").map_err(|_| {
            anyhow::anyhow!("SPOTIFY_CLIENT_SECRET environment variable must be set")
        })?;
        let spotify_redirect_uri = env::var("REDIRECT_URI")
            .map_err(|_| anyhow::anyhow!("REDIRECT_URI environment variable must be set"))?;
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable must be set"))?;

        Ok(Config {
            spotify_client_id,
            spotify_client_secret,
            spotify_redirect_uri,
            spotify_refresh_token: env::var("SPOTIFY_REFRESH_TOKEN").ok(),
            openai_api_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}
