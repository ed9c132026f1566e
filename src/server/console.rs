//! Interactive administrative console.
//!
//! A dedicated blocking thread owns stdin and turns menu input into
//! [`ConsoleCommand`] values on a channel; the async side applies them
//! through the same `BlogManager` the network sessions use, so console and
//! admin mutations serialize on the same index lock.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::mpsc;

use crate::state::AppState;

const MENU: &str = "\nOptions:\n\
                    t : Terminate program\n\
                    s : Sessions held\n\
                    l : List blogs\n\
                    c : Create blog\n\
                    d : Destroy blog";

#[derive(Debug)]
pub enum ConsoleCommand {
    Terminate,
    Sessions,
    List,
    Create { title: String, content: String },
    Destroy(u64),
}

/// Spawns the stdin reader thread and returns its command channel.
pub fn spawn_stdin_reader() -> mpsc::Receiver<ConsoleCommand> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || read_loop(tx));
    rx
}

/// Applies console commands until a terminate is received.
///
/// When stdin closes without a terminate (detached runs), the console goes
/// quiet instead of shutting the server down.
pub async fn run(mut commands: mpsc::Receiver<ConsoleCommand>, state: Arc<AppState>) {
    while let Some(command) = commands.recv().await {
        match command {
            ConsoleCommand::Terminate => return,
            ConsoleCommand::Sessions => {
                println!("Sessions held: {}", state.sessions.load(Ordering::Relaxed));
            }
            ConsoleCommand::List => {
                for (id, title) in state.blogs.list() {
                    println!("{id}: {title}");
                }
            }
            ConsoleCommand::Create { title, content } => {
                let id = state.blogs.create(&title, &content);
                println!("Created blog {id}");
            }
            ConsoleCommand::Destroy(id) => {
                if state.blogs.remove_by_id(id) {
                    println!("Destroyed blog {id}");
                } else {
                    println!("No blog {id}");
                }
            }
        }
    }

    std::future::pending::<()>().await;
}

fn read_loop(tx: mpsc::Sender<ConsoleCommand>) {
    let stdin = std::io::stdin();
    loop {
        println!("{MENU}");
        let Some(line) = read_line(&stdin) else {
            return;
        };

        let command = match line.trim() {
            "t" => ConsoleCommand::Terminate,
            "s" => ConsoleCommand::Sessions,
            "l" => ConsoleCommand::List,
            "c" => {
                println!("Enter the title:");
                let Some(title) = read_line(&stdin) else {
                    return;
                };
                println!("Enter the content:");
                let Some(content) = read_line(&stdin) else {
                    return;
                };
                ConsoleCommand::Create {
                    title: title.trim().to_string(),
                    content: content.trim().to_string(),
                }
            }
            "d" => {
                println!("Enter the number of the blog to be destroyed (n to cancel):");
                let Some(number) = read_line(&stdin) else {
                    return;
                };
                let number = number.trim();
                if number == "n" {
                    continue;
                }
                match number.parse() {
                    Ok(id) => ConsoleCommand::Destroy(id),
                    Err(_) => {
                        println!("Not a blog number: {number}");
                        continue;
                    }
                }
            }
            "" => continue,
            // Any other option terminates, same as `t`.
            _ => ConsoleCommand::Terminate,
        };

        let terminate = matches!(command, ConsoleCommand::Terminate);
        if tx.blocking_send(command).is_err() || terminate {
            return;
        }
    }
}

fn read_line(stdin: &std::io::Stdin) -> Option<String> {
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}
