use anyhow::Result;
use owo_colors::OwoColorize;
use remindr_core::config::RemindrConfig;
use remindr_core::remote::provider::Provider;

pub async fn run(provider_name: &str) -> Result<()> {
    let provider = Provider::from_name(provider_name);

    println!("Authenticating with {provider_name}...");

    // Provider runs the full OAuth flow and stores its own tokens
    let account = provider.authenticate().await?;

    println!("Authenticated as: {}\n", account.green());
    println!(
        "Add this to {}:\n",
        RemindrConfig::config_path()?.display()
    );
    println!("[remote]");
    println!("provider = \"{}\"", provider.name());
    println!("{}_account = \"{}\"", provider.name(), account);
    println!("{}_calendar_id = \"primary\"", provider.name());
    println!("\nRun `remindr calendars` to see which calendars you can use.");

    Ok(())
}
