pub mod aladhan;
pub mod error;

pub use aladhan::AladhanClient;
pub use error::FetchError;

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::net::TcpListener;

    /// A server that accepts connections and never answers.
    pub async fn stalled_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }
}
