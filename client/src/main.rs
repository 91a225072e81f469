use clap::Parser;
use client::game::ClientGame;
use client::input::Prompter;
use client::network::{self, NetError};
use client::rendering;
use log::{info, warn};
use shared::Message;
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:12345")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    info!("connecting to {}", args.server);
    let mut stream = TcpStream::connect(&args.server).await?;
    println!("Connected to {}.", args.server);

    let mut game = ClientGame::new();
    let mut prompter = Prompter::new();

    loop {
        let message = match network::read_server_message(&mut stream).await {
            Ok(message) => message,
            Err(NetError::UnknownOpcode(opcode)) => {
                warn!("ignoring unknown opcode {:#04x}", opcode);
                continue;
            }
            Err(NetError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                println!("Server closed the connection.");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        match message {
            Message::PlayerRole { role } => {
                game.set_role(role);
                rendering::show_role(role);
            }
            Message::SetWordRequest => {
                let word = prompter.secret_word().await?;
                network::send_message(
                    &mut stream,
                    &Message::SetWord {
                        word: word.into_bytes(),
                    },
                )
                .await?;
                println!("Word sent. Waiting for the guesser...");
            }
            Message::Start { word_len } => {
                game.begin_round(word_len);
            }
            Message::GameState {
                display,
                wrong,
                remaining,
                your_turn,
            } => {
                game.apply_state(display, wrong, remaining, your_turn);
                rendering::show_state(&game.display, &game.wrong, game.remaining);
                if game.is_setter() {
                    println!("Waiting for the guesser's move...");
                } else if game.my_turn && !game.round_over() {
                    // A terminal broadcast is followed by a game-over
                    // frame; prompting here would feed the restart
                    // negotiation a stray guess.
                    let letter = prompter.guess(&game).await?;
                    network::send_message(&mut stream, &Message::Guess { letter }).await?;
                }
            }
            Message::GameOverWin { word } => {
                rendering::show_round_end("You guessed the word!", &word);
            }
            Message::GameOverLose { word } => {
                rendering::show_round_end("Out of attempts, you lost this one.", &word);
            }
            Message::OpponentWon { word } => {
                rendering::show_round_end("The guesser got your word.", &word);
            }
            Message::OpponentLost { word } => {
                rendering::show_round_end("The guesser ran out of attempts.", &word);
            }
            Message::Restart { flag: 1 } => {
                let again = prompter.play_again().await?;
                network::send_message(
                    &mut stream,
                    &Message::Restart {
                        flag: u8::from(again),
                    },
                )
                .await?;
            }
            Message::Restart { flag } => {
                warn!("unexpected restart flag {} from server", flag);
            }
            Message::RestartConfirm { resume: true } => {
                println!("Back to the lobby for a new opponent.");
            }
            Message::RestartConfirm { resume: false } => {
                println!("Session over. Bye!");
                break;
            }
            Message::WaitingForPlayer => rendering::show_waiting(),
            other @ (Message::SetWord { .. } | Message::Guess { .. }) => {
                warn!("ignoring client-only frame echoed by the server: {:?}", other);
            }
        }
    }

    Ok(())
}
