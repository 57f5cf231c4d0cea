use teloxide::{prelude::*, utils::command::BotCommands};
use dotenvy::dotenv;
use std::sync::Arc;
use antiflood_bot::antiflood::AntiFlood;
use antiflood_bot::config::Config;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Bot commands")]
enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show the flood limits")]
    Limits,
}

async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    config: Arc<Config>,
) -> Result<(), teloxide::RequestError> {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, "Hello! I keep this chat free of floods.").await?;
        }
        Command::Limits => {
            bot.send_message(
                msg.chat.id,
                format!("Up to {} messages per {}s.", config.limit, config.interval),
            )
            .await?;
        }
    }
    Ok(())
}

async fn handle_message(msg: Message) {
    log::info!("Message {} in chat {} passed flood check", msg.id.0, msg.chat.id);
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid anti-flood configuration: {}", e);
            std::process::exit(1);
        }
    };

    let bot = Bot::from_env();
    let gate = Arc::new(AntiFlood::new(config.clone(), bot.clone()));
    let config = Arc::new(config);

    println!("Bot started!");

    let handler = dptree::filter_async({
        let gate = gate.clone();
        move |update: Update| {
            let gate = gate.clone();
            async move { gate.admit(&update).await }
        }
    })
    .branch(
        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint({
                        let config = config.clone();
                        move |bot: Bot, msg: Message, cmd: Command| {
                            let config = config.clone();
                            async move { answer(bot, msg, cmd, config).await }
                        }
                    }),
            )
            .branch(dptree::endpoint(|msg: Message| async move {
                handle_message(msg).await;
                Ok(())
            })),
    );

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
