//! Topic Catalog
//!
//! Well-known topic names shared by producers and consumers. The names are a
//! vocabulary contract: adding a topic is backward-compatible, renaming one
//! breaks every consumer, so bump [`CATALOG_VERSION`] when that happens.
//!
//! Publishing or subscribing to a name outside the catalog is allowed; the
//! bus never validates topic existence.

/// Version of the topic vocabulary
pub const CATALOG_VERSION: u32 = 1;

// ============================================================================
// PROTOCOL MESSAGES
// ============================================================================

/// Chat message received from a contact
pub const CHAT: &str = "Chat";
/// Contact nickname announcement
pub const NICK: &str = "Nick";
/// Funds sent notification
pub const SENT_FUNDS: &str = "SentFunds";
/// Incoming payment request
pub const REQUEST_FUNDS: &str = "RequestFunds";
/// Message read receipt
pub const MSG_READ: &str = "MsgRead";
/// Message delivery receipt
pub const MSG_RECEIVED: &str = "MsgReceived";
/// File transfer chunk
pub const FILE_DATA: &str = "FileData";
/// Request for a file transfer chunk
pub const REQUEST_FILE_DATA: &str = "RequestFileData";
/// File transfer offer header
pub const FILE_HEADER: &str = "FileHeader";
/// File transfer accepted
pub const ACCEPT_FILE: &str = "AcceptFile";
/// Answer to a payment request
pub const REQUEST_FUNDS_RESPONSE: &str = "RequestFundsResponse";
/// Bot accepted a contact request
pub const ACCEPT_ADD_BOT: &str = "AcceptAddBot";
/// App session payload
pub const APP_DATA: &str = "AppData";
/// App session invitation
pub const APP_REQUEST: &str = "AppRequest";
/// File transfer completed
pub const FILE_FULLY_RECEIVED: &str = "FileFullyReceived";
/// Contact avatar update
pub const AVATAR: &str = "Avatar";
/// App session invitation accepted
pub const APP_REQUEST_ACCEPT: &str = "AppRequestAccept";
/// App session invitation rejected
pub const APP_REQUEST_REJECT: &str = "AppRequestReject";
/// App session invitation failed
pub const APP_REQUEST_ERROR: &str = "AppRequestError";
/// App session ended
pub const APP_END_SESSION: &str = "AppEndSession";
/// Bot action
pub const BOT_ACTION: &str = "BotAction";
/// Message deleted by sender
pub const MSG_DELETE: &str = "MsgDelete";
/// Reaction to a message
pub const MSG_REACTION: &str = "MsgReaction";
/// Contact is typing
pub const MSG_TYPING: &str = "MsgTyping";
/// Group leave confirmed
pub const LEAVE_CONFIRMED: &str = "LeaveConfirmed";
/// Contact request
pub const REQUEST_ADD2: &str = "RequestAdd2";
/// Contact request accepted
pub const ACCEPT_ADD2: &str = "AcceptAdd2";
/// Query for supported app protocols
pub const GET_APP_PROTOCOLS: &str = "GetAppProtocols";
/// Supported app protocols
pub const APP_PROTOCOLS: &str = "AppProtocols";
/// App protocol payload
pub const APP_PROTOCOL_DATA: &str = "AppProtocolData";

// ============================================================================
// STATUS MESSAGES
// ============================================================================

/// Presence/status change of a contact
pub const FRIEND_STATUS_UPDATE: &str = "FriendStatusUpdate";
/// Outgoing message left the node
pub const MESSAGE_SENT: &str = "MessageSent";
/// Outgoing message expired before delivery
pub const MESSAGE_EXPIRED: &str = "MessageExpired";
/// Transaction inclusion status changed
pub const TRANSACTION_STATUS_UPDATE: &str = "TransactionStatusUpdate";

/// Every topic in the catalog, in declaration order
pub const ALL: &[&str] = &[
    CHAT,
    NICK,
    SENT_FUNDS,
    REQUEST_FUNDS,
    MSG_READ,
    MSG_RECEIVED,
    FILE_DATA,
    REQUEST_FILE_DATA,
    FILE_HEADER,
    ACCEPT_FILE,
    REQUEST_FUNDS_RESPONSE,
    ACCEPT_ADD_BOT,
    APP_DATA,
    APP_REQUEST,
    FILE_FULLY_RECEIVED,
    AVATAR,
    APP_REQUEST_ACCEPT,
    APP_REQUEST_REJECT,
    APP_REQUEST_ERROR,
    APP_END_SESSION,
    BOT_ACTION,
    MSG_DELETE,
    MSG_REACTION,
    MSG_TYPING,
    LEAVE_CONFIRMED,
    REQUEST_ADD2,
    ACCEPT_ADD2,
    GET_APP_PROTOCOLS,
    APP_PROTOCOLS,
    APP_PROTOCOL_DATA,
    FRIEND_STATUS_UPDATE,
    MESSAGE_SENT,
    MESSAGE_EXPIRED,
    TRANSACTION_STATUS_UPDATE,
];

/// Whether `name` is part of the catalog (exact, case-sensitive match)
pub fn is_known(name: &str) -> bool {
    ALL.contains(&name)
}
