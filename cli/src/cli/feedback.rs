use chrono::{SecondsFormat, Utc};

use crate::{
    api::proxy::{Api, Feedback},
    cli::{ActivateArgs, FeedbackArgs},
    prelude::*,
};

pub fn feedback(api: &Api, args: &FeedbackArgs) -> Result {
    ensure!(!args.message.trim().is_empty(), "the message must not be empty");
    let key = api.send_feedback(&Feedback {
        name: args.name.as_deref(),
        rating: args.rating.as_deref(),
        message: &args.message,
        page: "cli",
        ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })?;
    info!(key, "the feedback is stored, thank you");
    Ok(())
}

pub fn activate(api: &Api, args: &ActivateArgs) -> Result {
    if api.validate_premium(&args.key, &args.device_id)? {
        println!("The premium key is accepted, the activation is recorded.");
    } else {
        println!("The premium key is rejected.");
    }
    Ok(())
}
