use serde::{Deserialize, Serialize};
use std::fmt;

use super::super::game::{GameRecord, GuessStatus};

/// Opaque session credential issued by the account store on a successful
/// register or login.
///
/// The session server never inspects the contents; it only carries the
/// token between the player and the account store.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A packet from a player's client to the session server.
///
/// The `packet_type` field on the wire selects the variant; a packet
/// with an unknown or missing `packet_type` fails to decode instead of
/// falling through as an untyped string.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "packet_type", rename_all = "snake_case")]
pub enum ClientPacket {
    /// Credential hand-off for a new account. Only valid as the first
    /// packet on a connection.
    Register { username: String, password: String },
    /// Credential hand-off for an existing account. Same constraint.
    Login { username: String, password: String },
    /// Start a game.
    Play { token: Token },
    /// One guess while a game is running.
    Guess { guess: String },
    /// Fetch the player's finished-game history.
    History { token: Token },
    /// Erase the player's finished-game history.
    ClearHistory { token: Token },
    /// Change the account password.
    ChangePassword { token: Token, new_password: String },
    /// End the session. The token is optional because older clients
    /// never sent one.
    Logout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<Token>,
    },
    /// Acknowledges a `wordle_result` packet.
    Ack,
}

impl fmt::Display for ClientPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Register { username, .. } => &format!("register ({username})"),
            Self::Login { username, .. } => &format!("login ({username})"),
            Self::Play { .. } => "play",
            Self::Guess { .. } => "guess",
            Self::History { .. } => "history",
            Self::ClearHistory { .. } => "clear_history",
            Self::ChangePassword { .. } => "change_password",
            Self::Logout { .. } => "logout",
            Self::Ack => "ack",
        };
        write!(f, "{repr}")
    }
}

/// A packet from the session server to a player's client.
///
/// Account-store responses that the session relays verbatim (auth
/// verdicts, history payloads) are raw JSON values and never round-trip
/// through this type.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "packet_type", rename_all = "snake_case")]
pub enum ServerPacket {
    /// The server is ready for the numbered guess (1-based).
    WaitingForGuess { guess_number: usize },
    /// Letter-by-letter evaluation of the latest guess. The client must
    /// acknowledge it before the server sends anything else.
    WordleResult { response: Vec<GuessStatus> },
    /// The game ended. The secret word is revealed either way.
    GameOver {
        game_over_message: String,
        word: String,
    },
    /// A protocol, game-rule, or backend failure, described for the
    /// player.
    Error { response: String },
}

impl fmt::Display for ServerPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::WaitingForGuess { guess_number } => &format!("waiting for guess #{guess_number}"),
            Self::WordleResult { response } => {
                &response.iter().map(ToString::to_string).collect::<String>()
            }
            Self::GameOver {
                game_over_message,
                word,
            } => &format!("{game_over_message} The word was {word:?}"),
            Self::Error { response } => response,
        };
        write!(f, "{repr}")
    }
}

/// A request from the session server to the account store.
///
/// The credential and password-change variants are byte-for-byte the
/// client packets of the same name, forwarded unchanged; the history
/// variants are built by the server around the session token.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "packet_type", rename_all = "snake_case")]
pub enum StoreRequest {
    Register { username: String, password: String },
    Login { username: String, password: String },
    GetHistory { token: Token },
    ClearHistory { token: Token },
    AddHistory { token: Token, data: GameRecord },
    ChangePassword { token: Token, new_password: String },
}

/// A request from the session server to the dictionary service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "packet_type", rename_all = "snake_case")]
pub enum OracleRequest {
    GetRandomWord { length: usize },
    ValidateWord { word: String },
}

/// Lenient view over an account-store response: just enough to decide
/// whether the operation succeeded and to pick up an issued token.
#[derive(Debug, Deserialize)]
pub struct StoreReply {
    pub response: String,
    #[serde(default)]
    pub token: Option<Token>,
}

impl StoreReply {
    /// The store reports success with the literal string `"success"`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response == "success"
    }
}

/// Dictionary response carrying a word.
#[derive(Debug, Deserialize)]
pub struct WordReply {
    pub response: String,
}

/// Dictionary response carrying a validity verdict.
#[derive(Debug, Deserialize)]
pub struct ValidityReply {
    pub response: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::{json, to_value};

    use super::*;

    // === Client packets ===

    #[test]
    fn test_register_wire_shape() {
        let packet = ClientPacket::Register {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({"packet_type": "register", "username": "alice", "password": "hunter2"})
        );
    }

    #[test]
    fn test_login_wire_shape() {
        let packet = ClientPacket::Login {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({"packet_type": "login", "username": "alice", "password": "hunter2"})
        );
    }

    #[test]
    fn test_play_wire_shape() {
        let packet = ClientPacket::Play {
            token: Token::new("abc123"),
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({"packet_type": "play", "token": "abc123"})
        );
    }

    #[test]
    fn test_guess_wire_shape() {
        let packet = ClientPacket::Guess {
            guess: "crane".to_string(),
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({"packet_type": "guess", "guess": "crane"})
        );
    }

    #[test]
    fn test_ack_wire_shape() {
        assert_eq!(
            to_value(ClientPacket::Ack).unwrap(),
            json!({"packet_type": "ack"})
        );
    }

    #[test]
    fn test_logout_without_token_omits_the_field() {
        assert_eq!(
            to_value(ClientPacket::Logout { token: None }).unwrap(),
            json!({"packet_type": "logout"})
        );
    }

    #[test]
    fn test_logout_parses_with_and_without_token() {
        let bare: ClientPacket = serde_json::from_value(json!({"packet_type": "logout"})).unwrap();
        assert_eq!(bare, ClientPacket::Logout { token: None });

        let tokened: ClientPacket =
            serde_json::from_value(json!({"packet_type": "logout", "token": "abc123"})).unwrap();
        assert_eq!(
            tokened,
            ClientPacket::Logout {
                token: Some(Token::new("abc123")),
            }
        );
    }

    #[test]
    fn test_unknown_packet_type_is_rejected() {
        let result: Result<ClientPacket, _> =
            serde_json::from_value(json!({"packet_type": "dance"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_packet_type_is_rejected() {
        let result: Result<ClientPacket, _> = serde_json::from_value(json!({"guess": "crane"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result: Result<ClientPacket, _> = serde_json::from_value(json!({"packet_type": "guess"}));
        assert!(result.is_err());
    }

    // === Server packets ===

    #[test]
    fn test_waiting_for_guess_wire_shape() {
        assert_eq!(
            to_value(ServerPacket::WaitingForGuess { guess_number: 3 }).unwrap(),
            json!({"packet_type": "waiting_for_guess", "guess_number": 3})
        );
    }

    #[test]
    fn test_wordle_result_wire_shape() {
        let packet = ServerPacket::WordleResult {
            response: vec![
                GuessStatus::CorrectLetterPosition,
                GuessStatus::CorrectLetter,
                GuessStatus::Incorrect,
            ],
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({
                "packet_type": "wordle_result",
                "response": ["CORRECT_LETTER_POSITION", "CORRECT_LETTER", "INCORRECT"],
            })
        );
    }

    #[test]
    fn test_game_over_wire_shape() {
        let packet = ServerPacket::GameOver {
            game_over_message: "You win!".to_string(),
            word: "crane".to_string(),
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({
                "packet_type": "game_over",
                "game_over_message": "You win!",
                "word": "crane",
            })
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let packet = ServerPacket::Error {
            response: "invalid choice".to_string(),
        };
        assert_eq!(
            to_value(&packet).unwrap(),
            json!({"packet_type": "error", "response": "invalid choice"})
        );
    }

    // === Backend requests ===

    #[test]
    fn test_forwarded_credentials_match_the_client_packet() {
        // Login and register reach the store as the client sent them, so
        // the two types must agree on the wire.
        let client = ClientPacket::Login {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let store = StoreRequest::Login {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(to_value(&client).unwrap(), to_value(&store).unwrap());
    }

    #[test]
    fn test_forwarded_password_change_matches_the_client_packet() {
        let client = ClientPacket::ChangePassword {
            token: Token::new("abc123"),
            new_password: "letmein".to_string(),
        };
        let store = StoreRequest::ChangePassword {
            token: Token::new("abc123"),
            new_password: "letmein".to_string(),
        };
        assert_eq!(to_value(&client).unwrap(), to_value(&store).unwrap());
    }

    #[test]
    fn test_add_history_wire_shape() {
        let request = StoreRequest::AddHistory {
            token: Token::new("abc123"),
            data: GameRecord {
                win: false,
                word: "crane".to_string(),
                guesses: vec!["slate".to_string(), "bread".to_string()],
            },
        };
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "packet_type": "add_history",
                "token": "abc123",
                "data": {"win": false, "word": "crane", "guesses": ["slate", "bread"]},
            })
        );
    }

    #[test]
    fn test_oracle_request_wire_shapes() {
        assert_eq!(
            to_value(OracleRequest::GetRandomWord { length: 5 }).unwrap(),
            json!({"packet_type": "get_random_word", "length": 5})
        );
        assert_eq!(
            to_value(OracleRequest::ValidateWord {
                word: "crane".to_string(),
            })
            .unwrap(),
            json!({"packet_type": "validate_word", "word": "crane"})
        );
    }

    // === Backend replies ===

    #[test]
    fn test_store_reply_success_with_token() {
        let reply: StoreReply = serde_json::from_value(json!({
            "packet_type": "response",
            "response": "success",
            "token": "abc123",
        }))
        .unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.token, Some(Token::new("abc123")));
    }

    #[test]
    fn test_store_reply_failure_without_token() {
        let reply: StoreReply = serde_json::from_value(json!({
            "packet_type": "error",
            "response": "user does not exist, or password is wrong",
        }))
        .unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.token, None);
    }

    #[test]
    fn test_oracle_replies() {
        let word: WordReply = serde_json::from_value(json!({"response": "crane"})).unwrap();
        assert_eq!(word.response, "crane");

        let validity: ValidityReply = serde_json::from_value(json!({"response": true})).unwrap();
        assert!(validity.response);
    }

    #[test]
    fn test_token_serializes_transparently() {
        assert_eq!(to_value(Token::new("abc123")).unwrap(), json!("abc123"));
        assert_eq!(Token::new("abc123").to_string(), "abc123");
    }
}
