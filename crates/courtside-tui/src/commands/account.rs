// login / register / logout / whoami

use anyhow::Result;

use courtside_core::models::NewUser;

use super::Context;
use crate::output;

pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let user = ctx.session.login(email, password).await?;
    println!("Logged in as {}", output::user_line(&user));
    Ok(())
}

pub async fn register(ctx: &Context, new_user: NewUser) -> Result<()> {
    let user = ctx.session.register(&new_user).await?;
    println!("Welcome, {}", output::user_line(&user));
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }
    ctx.session.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.current_user() {
        Some(user) => println!("{}", output::user_line(&user)),
        None => println!("Not logged in"),
    }
    Ok(())
}
