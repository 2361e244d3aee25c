//! Dice roll command handler.
//!
//! Rolls a dice with 6 sides by default. The `sides` option accepts values
//! between 1 and 1000; anything else gets a private error.

use futures::{FutureExt, future::BoxFuture};
use log::debug;
use rand::Rng;

use crate::commands::{
    CommandContext, CommandHandler, Reply,
    responses::{format_invalid_sides, format_roll},
    schema::{CommandOption, CommandSchema},
};

const DEFAULT_SIDES: i64 = 6;
const MIN_SIDES: i64 = 1;
const MAX_SIDES: i64 = 1000;

pub struct RollCommand;

/// Rolls a dice with `sides` sides, or returns the error reply.
fn roll(sides: i64) -> Result<i64, Reply> {
    if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
        debug!("invalid number of sides: {}", sides);
        return Err(Reply::private(format_invalid_sides(MIN_SIDES, MAX_SIDES)));
    }

    Ok(rand::thread_rng().gen_range(1..=sides))
}

impl CommandHandler for RollCommand {
    fn schema(&self) -> CommandSchema {
        CommandSchema::new("roll", "Roll a dice with specified number of sides").option(
            CommandOption::integer("sides", "Number of sides on the dice (default: 6)")
                .range(MIN_SIDES, MAX_SIDES),
        )
    }

    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        let sides = context
            .invocation
            .integer_param("sides")
            .unwrap_or(DEFAULT_SIDES);
        // The thread local generator is not Send, roll before building the future
        let reply = match roll(sides) {
            Ok(result) => Reply::public(format_roll(result, sides)),
            Err(reply) => reply,
        };

        async move { reply }.boxed()
    }
}
