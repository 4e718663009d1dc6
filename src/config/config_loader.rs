use anyhow::Result;

use super::config_model::{Auth, Database, DotEnvyConfig, Paypal, Server, Stripe, Youtube};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let auth = Auth {
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    };

    let youtube = Youtube {
        api_key: std::env::var("YOUTUBE_API_KEY").expect("YOUTUBE_API_KEY is invalid"),
    };

    let stripe = Stripe {
        secret_key: std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY is invalid"),
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET is invalid"),
    };

    let paypal = Paypal {
        mode: std::env::var("PAYPAL_MODE").unwrap_or_else(|_| "sandbox".to_string()),
        client_id: std::env::var("PAYPAL_CLIENT_ID").expect("PAYPAL_CLIENT_ID is invalid"),
        client_secret: std::env::var("PAYPAL_CLIENT_SECRET")
            .expect("PAYPAL_CLIENT_SECRET is invalid"),
        return_url: std::env::var("PAYPAL_RETURN_URL").expect("PAYPAL_RETURN_URL is invalid"),
        cancel_url: std::env::var("PAYPAL_CANCEL_URL").expect("PAYPAL_CANCEL_URL is invalid"),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        youtube,
        stripe,
        paypal,
    })
}
