pub async fn alive() -> &'static str {
    "Alive"
}
