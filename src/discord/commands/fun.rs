use crate::core::games::{play_rps, roll_die, RpsChoice, RpsOutcome};
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![roll(), rps()]
}

/// Rolls a die with a specified number of sides.
#[poise::command(slash_command, prefix_command)]
pub async fn roll(
    ctx: Context<'_>,
    #[description = "Number of sides"] sides: u32,
) -> Result<(), Error> {
    let result = match roll_die(sides) {
        Ok(result) => result,
        Err(err) => {
            ctx.say(err.to_string()).await?;
            return Ok(());
        }
    };

    let embed = serenity::CreateEmbed::new()
        .title("🎲 Dice Roll")
        .description(format!(
            "<@{}> rolled a {} on a {}-sided dice!",
            ctx.author().id,
            result,
            sides
        ))
        .color(serenity::Colour::PURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Play a game of rock-paper-scissors. Choices: rock, paper, scissors
#[poise::command(slash_command, prefix_command)]
pub async fn rps(
    ctx: Context<'_>,
    #[description = "rock, paper or scissors"] choice: String,
) -> Result<(), Error> {
    let player: RpsChoice = match choice.parse() {
        Ok(player) => player,
        Err(err) => {
            let embed = serenity::CreateEmbed::new()
                .title("Invalid Choice")
                .description(err.to_string())
                .color(serenity::Colour::RED);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    let bot = RpsChoice::random();
    let outcome = play_rps(player, bot);
    let color = match outcome {
        RpsOutcome::Tie => serenity::Colour::GOLD,
        RpsOutcome::PlayerWins => serenity::Colour::DARK_GREEN,
        RpsOutcome::BotWins => serenity::Colour::BLUE,
    };

    let embed = serenity::CreateEmbed::new()
        .title("Rock-Paper-Scissors")
        .description(outcome.headline())
        .color(color)
        .field("Your Choice", player.to_string(), true)
        .field("Bot Choice", bot.to_string(), true);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
