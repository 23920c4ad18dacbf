//! Demo binary: connect a wallet and optionally send one tip

use std::env;
use std::sync::Arc;

use dotenv::dotenv;

use monad_tip::{SessionConfig, TipLedger, TipStatus, WalletSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let session = WalletSession::from_config(SessionConfig::from_env())?;

    let ledger = Arc::new(TipLedger::default());
    let follower = {
        let ledger = Arc::clone(&ledger);
        let updates = session.subscribe();
        tokio::spawn(async move { ledger.follow(updates).await })
    };

    let wallet = session.connect().await?;
    println!("✓ Connected {} on {}", wallet.address, wallet.network);
    println!(
        "  Balance: {:.4} {}",
        wallet.balance,
        session.chain().native_currency.symbol
    );

    let recipient = match env::var("TIP_RECIPIENT") {
        Ok(recipient) => recipient,
        Err(_) => {
            println!("TIP_RECIPIENT not set, nothing to send");
            return Ok(());
        }
    };
    let amount: f64 = env::var("TIP_AMOUNT")
        .unwrap_or_else(|_| "0.01".to_string())
        .parse()?;

    send_and_wait(&session, &recipient, amount).await?;

    session.disconnect();
    drop(session);
    follower.await?;

    let earnings = ledger.earnings(&recipient);
    println!(
        "  Recipient earnings this session: {} MON over {} tips",
        earnings.total_earnings, earnings.tip_count
    );

    Ok(())
}

async fn send_and_wait(
    session: &WalletSession,
    recipient: &str,
    amount: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut updates = session.subscribe();

    let tip = session.send_tip(recipient, amount).await?;
    println!("✓ Tip submitted");
    println!("  Hash: {}", tip.hash);
    if let Some(url) = session.chain().explorer_tx_url(&tip.hash) {
        println!("  Explorer: {}", url);
    }

    loop {
        let update = updates.recv().await?;
        if update.hash != tip.hash {
            continue;
        }

        match update.status {
            TipStatus::Confirmed => println!("✓ Tip of {} MON confirmed", update.amount),
            TipStatus::Failed => println!("✗ Tip failed on chain"),
            TipStatus::Pending => continue,
        }
        return Ok(());
    }
}
