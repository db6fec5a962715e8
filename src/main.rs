use anyhow::Result;

use taskdeck::backend::factory;
use taskdeck::config::Config;
use taskdeck::logger;
use taskdeck::sync::TaskService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    let backend = factory::create_backend(&config).await?;
    let service = TaskService::new(backend, &config);
    service.start().await;

    if let Some(error) = service.error().await {
        eprintln!("❌ {error}");
        return Ok(());
    }

    let tasks = service.tasks().await;
    println!("📋 {} tasks", tasks.len());
    println!("☀️  My Day: {}", service.tasks_for_my_day().await.len());
    println!("📅 Upcoming: {}", service.upcoming_tasks().await.len());
    println!("⭐ Important: {}", service.important_tasks().await.len());

    service.stop().await;
    Ok(())
}
