pub mod credits;
pub mod followage;
pub mod gamble;
pub mod points;
pub mod watchtime;

use crate::twitch::handler::TwitchMessageHandler;

pub type TwitchHandlerCollection = Vec<Box<dyn TwitchMessageHandler>>;
