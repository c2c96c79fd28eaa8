//! # Lifecycle Scenarios
//!
//! End-to-end protocol runs over the in-memory stack: issue, transfer,
//! forged submissions, fact mutation, signer policies, and session
//! timeouts. Every run goes through the real initiator/responder services,
//! the Ed25519 signer, and the notary's signature verification.

#[cfg(test)]
mod tests {
    use crate::integration::TestLedger;
    use dc_01_transition_validation::SignerPolicy;
    use dc_02_transfer_coordination::{
        CoordinationConfig, CoordinationError, IdentitySigner, SequencerError, SessionError,
        SessionMessage, TransferCoordinationApi, PROTOCOL_VERSION,
    };
    use shared_types::{
        AssetFacts, AssetRecord, FinalizedTransition, Intent, Proposal, SequencePosition,
        SignedProposal, UnspentRecord,
    };

    fn oak_street() -> AssetFacts {
        AssetFacts::new("12 Oak St", "1200sqft", 3, 2020)
    }

    // =========================================================================
    // ISSUE
    // =========================================================================

    #[tokio::test]
    async fn test_issue_creates_unspent_record_owned_by_builder() {
        let ledger = TestLedger::new();
        let builder = ledger.join(1);

        let finalized = ledger
            .initiator(&builder)
            .issue(oak_street())
            .await
            .unwrap();

        assert_eq!(finalized.position, SequencePosition(0));
        let output = finalized.output().unwrap();
        assert_eq!(output.owner, builder.id());
        assert_eq!(output.builder, builder.id());

        // The broadcast landed in the builder's vault.
        let held = builder.vault.must_hold("12 Oak St").await;
        assert_eq!(held.record.record_ref, output.record_ref);
        assert_eq!(ledger.notary.accepted_count().await, 1);
    }

    #[tokio::test]
    async fn test_issue_forged_by_stranger_rejected_by_notary() {
        let ledger = TestLedger::new();
        let victim = ledger.join(1);
        let stranger = ledger.join(2);

        // The stranger names the victim as builder but can only sign as
        // itself.
        let record = AssetRecord::issued(oak_street(), victim.id(), victim.id());
        let proposal = Proposal::new(
            Intent::Issue,
            vec![stranger.id()],
            vec![],
            vec![record],
            ledger.notary.notary_id(),
        );
        let mut signed = SignedProposal::new(proposal);
        let approval = stranger.signer.sign(&signed.proposal);
        signed.attach(approval);

        let err = ledger.notary.sequence(&signed).await.unwrap_err();
        let SequencerError::Malformed(reason) = err else {
            panic!("expected malformed rejection");
        };
        assert!(reason.starts_with("builder signature required"));
        assert_eq!(ledger.notary.accepted_count().await, 0);
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    #[tokio::test]
    async fn test_transfer_moves_ownership_and_preserves_facts() {
        let ledger = TestLedger::new();
        let builder = ledger.join(1);
        let buyer = ledger.join(2);

        let issued = ledger
            .initiator(&builder)
            .issue(oak_street())
            .await
            .unwrap();

        let finalized = ledger
            .initiator(&builder)
            .transfer("12 Oak St", buyer.id())
            .await
            .unwrap();

        let output = finalized.output().unwrap();
        assert_eq!(output.owner, buyer.id());
        assert!(issued.output().unwrap().facts_match(output));
        assert!(finalized.proposal.is_signed_by(builder.id()));
        assert!(finalized.proposal.is_signed_by(buyer.id()));

        // Both participants converge on the new lineage head.
        let buyer_view = buyer.vault.must_hold("12 Oak St").await;
        let builder_view = builder.vault.must_hold("12 Oak St").await;
        assert_eq!(buyer_view.record.record_ref, output.record_ref);
        assert_eq!(builder_view.record.record_ref, output.record_ref);
        assert_eq!(ledger.notary.accepted_count().await, 2);
    }

    #[tokio::test]
    async fn test_tampered_transfer_declined_by_responder() {
        let ledger = TestLedger::new();
        let builder = ledger.join(1);
        let buyer = ledger.join(2);

        ledger
            .initiator(&builder)
            .issue(oak_street())
            .await
            .unwrap();
        let input = builder.vault.must_hold("12 Oak St").await;

        // Hand-craft a transfer that shrinks the build area in flight.
        let mut output = input.record.transferred_to(buyer.id());
        output.build_area = "1000sqft".to_string();
        let proposal = Proposal::new(
            Intent::Transfer,
            vec![builder.id(), buyer.id()],
            vec![input],
            vec![output],
            ledger.notary.notary_id(),
        );
        let mut signed = SignedProposal::new(proposal);
        let approval = builder.signer.sign(&signed.proposal);
        signed.attach(approval);

        // Offer it to the buyer's responder directly.
        use dc_02_transfer_coordination::SessionTransport;
        let mut session = ledger.network.open(buyer.id()).await.unwrap();
        session
            .send(SessionMessage::ProposalOffer {
                version: PROTOCOL_VERSION,
                proposal: signed.clone(),
            })
            .await
            .unwrap();

        let reply = session.recv().await.unwrap();
        let SessionMessage::ApprovalDeclined { reason } = &reply else {
            panic!("expected decline, got {}", reply.kind());
        };
        assert!(reason.starts_with("transfer must preserve asset facts"));

        // The notary independently refuses the same tampered proposal.
        let err = ledger.notary.sequence(&signed).await.unwrap_err();
        assert!(matches!(err, SequencerError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_transfer_of_unknown_lineage_is_not_found() {
        let ledger = TestLedger::new();
        let builder = ledger.join(1);
        let buyer = ledger.join(2);

        let err = ledger
            .initiator(&builder)
            .transfer("99 Nowhere Ln", buyer.id())
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::NotFound { .. }));
    }

    // =========================================================================
    // SIGNER POLICY
    // =========================================================================

    #[tokio::test]
    async fn test_builder_countersigns_once_no_longer_owner() {
        let ledger = TestLedger::with_policy(SignerPolicy::BuilderCountersigns);
        let builder = ledger.join(1);
        let first_owner = ledger.join(2);
        let second_owner = ledger.join(3);

        ledger
            .initiator(&builder)
            .issue(oak_street())
            .await
            .unwrap();

        // Builder is still the owner: only the new owner countersigns.
        let first_hop = ledger
            .initiator(&builder)
            .transfer("12 Oak St", first_owner.id())
            .await
            .unwrap();
        assert_eq!(first_hop.proposal.approvals.len(), 2);

        // Builder no longer owns the asset: the policy now pulls it into
        // the signer set alongside both owners.
        let second_hop = ledger
            .initiator(&first_owner)
            .transfer("12 Oak St", second_owner.id())
            .await
            .unwrap();
        assert!(second_hop.proposal.is_signed_by(builder.id()));
        assert!(second_hop.proposal.is_signed_by(first_owner.id()));
        assert!(second_hop.proposal.is_signed_by(second_owner.id()));
        assert_eq!(second_hop.proposal.approvals.len(), 3);
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    #[tokio::test]
    async fn test_transfer_times_out_when_counterparty_never_answers() {
        let ledger = TestLedger::with_config(CoordinationConfig {
            session_timeout_ms: 50,
            ..Default::default()
        });
        let builder = ledger.join(1);
        let buyer = ledger.join_silent(2);
        // Registered on the network, but nobody serves the sessions.
        let _idle_listener = ledger.network.register(buyer.id());

        ledger
            .initiator(&builder)
            .issue(oak_street())
            .await
            .unwrap();

        let err = ledger
            .initiator(&builder)
            .transfer("12 Oak St", buyer.id())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoordinationError::Session(SessionError::Timeout { timeout_ms: 50 })
        ));

        // The failed run left no trace: the record is still unspent and
        // owned by the builder.
        let held = builder.vault.must_hold("12 Oak St").await;
        assert_eq!(held.record.owner, builder.id());
        assert_eq!(ledger.notary.accepted_count().await, 1);
    }

    // =========================================================================
    // WIRE FORMAT
    // =========================================================================

    #[tokio::test]
    async fn test_finalized_transition_survives_json_round_trip() {
        let ledger = TestLedger::new();
        let builder = ledger.join(1);

        let finalized = ledger
            .initiator(&builder)
            .issue(oak_street())
            .await
            .unwrap();

        let json = serde_json::to_string(&finalized).unwrap();
        assert!(json.contains("12 Oak St"));

        let back: FinalizedTransition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, finalized);
        assert_eq!(back.participants(), vec![builder.id()]);
    }

    // Helper so scenario assertions read as one line.
    trait VaultExt {
        async fn must_hold(&self, address: &str) -> UnspentRecord;
    }

    impl VaultExt for dc_02_transfer_coordination::adapters::InMemoryVault {
        async fn must_hold(&self, address: &str) -> UnspentRecord {
            use dc_02_transfer_coordination::VaultStore;
            self.find_unspent(address)
                .await
                .unwrap()
                .unwrap_or_else(|| panic!("no unspent record for {address}"))
        }
    }
}
