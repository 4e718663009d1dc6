pub mod youtube_client;
