use slingon::{Direction, EngineConfig, MemoryStore, TranslationEngine};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let store = Arc::new(MemoryStore::new());
    let engine = TranslationEngine::load(store, EngineConfig::default()).await;

    let source = "Я иду домой. Мы читаем *Tolstoy*, 42 страницы!";
    let forward = engine.translate(source, Direction::Forward).await;
    println!("Source:  {}", source);
    println!("Slingon: {}", forward.text);

    let back = engine.translate(&forward.text, Direction::Reverse).await;
    println!("Back:    {}", back.text);

    println!("Learned:");
    for (source, target) in &forward.learned {
        println!("  {} → {}", source, target);
    }
}
