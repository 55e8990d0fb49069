//! Field numbers of the outer transaction envelope.
//!
//! The envelope is a protobuf `oneof` over message kinds followed by the fee, signature and
//! preimage fields. The table below is the wire contract with the chain and must not be
//! renumbered.

use std::fmt;

/// Every message kind the transaction envelope can carry.
///
/// Only some of them have a domain transaction; the rest are recognised so that decoding can
/// report what it found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Send,
    NewToken,
    SetName,
    CreateEscrow,
    ReleaseEscrow,
    ReturnEscrow,
    UpdateEscrowParties,
    CreateContract,
    UpdateContract,
    SetValidators,
    AddApproval,
    RemoveApproval,
    IssueUsername,
    AddUsernameAddress,
    RemoveUsernameAddress,
    IssueBlockchain,
    IssueTicker,
    IssueBootstrapNode,
}

/// The oneof members of the envelope, by field number.
pub const TX_MESSAGE_FIELDS: [(u32, MessageKind); 18] = [
    (1, MessageKind::Send),
    (2, MessageKind::NewToken),
    (3, MessageKind::SetName),
    (4, MessageKind::CreateEscrow),
    (5, MessageKind::ReleaseEscrow),
    (6, MessageKind::ReturnEscrow),
    (7, MessageKind::UpdateEscrowParties),
    (8, MessageKind::CreateContract),
    (9, MessageKind::UpdateContract),
    (10, MessageKind::SetValidators),
    (11, MessageKind::AddApproval),
    (12, MessageKind::RemoveApproval),
    (13, MessageKind::IssueUsername),
    (14, MessageKind::AddUsernameAddress),
    (15, MessageKind::RemoveUsernameAddress),
    (16, MessageKind::IssueBlockchain),
    (17, MessageKind::IssueTicker),
    (18, MessageKind::IssueBootstrapNode),
];

pub const TX_FEES_FIELD: u32 = 20;
pub const TX_SIGNATURES_FIELD: u32 = 21;
pub const TX_PREIMAGE_FIELD: u32 = 22;

impl MessageKind {
    pub fn field_number(self) -> u32 {
        TX_MESSAGE_FIELDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(n, _)| *n)
            .unwrap_or_default()
    }

    pub fn from_field_number(number: u32) -> Option<MessageKind> {
        TX_MESSAGE_FIELDS
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, kind)| *kind)
    }

    /// True if the kind maps onto a domain transaction.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            MessageKind::Send
                | MessageKind::SetName
                | MessageKind::CreateEscrow
                | MessageKind::ReleaseEscrow
                | MessageKind::ReturnEscrow
                | MessageKind::IssueUsername
                | MessageKind::AddUsernameAddress
                | MessageKind::RemoveUsernameAddress
                | MessageKind::IssueBlockchain
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Send => "send",
            MessageKind::NewToken => "newToken",
            MessageKind::SetName => "setName",
            MessageKind::CreateEscrow => "createEscrow",
            MessageKind::ReleaseEscrow => "releaseEscrow",
            MessageKind::ReturnEscrow => "returnEscrow",
            MessageKind::UpdateEscrowParties => "updateEscrow",
            MessageKind::CreateContract => "createContract",
            MessageKind::UpdateContract => "updateContract",
            MessageKind::SetValidators => "setValidators",
            MessageKind::AddApproval => "addApproval",
            MessageKind::RemoveApproval => "removeApproval",
            MessageKind::IssueUsername => "issueUsername",
            MessageKind::AddUsernameAddress => "addUsernameAddress",
            MessageKind::RemoveUsernameAddress => "removeUsernameAddress",
            MessageKind::IssueBlockchain => "issueBlockchain",
            MessageKind::IssueTicker => "issueTicker",
            MessageKind::IssueBootstrapNode => "issueBootstrapNode",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_consistent() {
        for (number, kind) in TX_MESSAGE_FIELDS {
            assert_eq!(kind.field_number(), number);
            assert_eq!(MessageKind::from_field_number(number), Some(kind));
            assert!(number < TX_FEES_FIELD);
        }
        assert_eq!(MessageKind::from_field_number(19), None);
        assert_eq!(MessageKind::from_field_number(TX_SIGNATURES_FIELD), None);
    }

    #[test]
    fn supported_kinds() {
        let supported: Vec<u32> = TX_MESSAGE_FIELDS
            .iter()
            .filter(|(_, k)| k.is_supported())
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(supported, vec![1, 3, 4, 5, 6, 13, 14, 15, 16]);
    }
}
