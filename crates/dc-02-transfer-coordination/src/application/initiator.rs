//! Initiator role
//!
//! Drives one proposal run through the phase machine: assemble, validate
//! locally, self-sign, collect counterparty approvals over sessions,
//! submit to the notary, broadcast finality. Validation and signature
//! problems are caught before the first message leaves the node.

use crate::config::CoordinationConfig;
use crate::domain::errors::CoordinationError;
use crate::domain::run::{ProposalPhase, ProposalRun};
use crate::ipc::payloads::{SessionMessage, PROTOCOL_VERSION};
use crate::ports::inbound::TransferCoordinationApi;
use crate::ports::outbound::{
    IdentitySigner, ParticipantNotifier, SequencerGateway, SessionError, SessionTransport,
    VaultStore,
};
use async_trait::async_trait;
use dc_01_transition_validation::TransitionValidator;
use shared_types::{
    AssetFacts, AssetRecord, FinalizedTransition, Intent, NotaryId, PartyId, Proposal,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Initiator service: the party proposing an issue or a transfer.
///
/// Holds no state across runs; every call to [`TransferCoordinationApi`]
/// creates a fresh `ProposalRun`, so any number of proposals may be in
/// flight concurrently without locks.
pub struct InitiatorService {
    validator: TransitionValidator,
    notary: NotaryId,
    vault: Arc<dyn VaultStore>,
    transport: Arc<dyn SessionTransport>,
    sequencer: Arc<dyn SequencerGateway>,
    signer: Arc<dyn IdentitySigner>,
    notifier: Arc<dyn ParticipantNotifier>,
}

impl InitiatorService {
    /// Wire an initiator against its collaborators.
    ///
    /// `notary` is the sequencing instance new lineages are issued
    /// against; transfers inherit the consumed input's notary instead.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &CoordinationConfig,
        notary: NotaryId,
        vault: Arc<dyn VaultStore>,
        transport: Arc<dyn SessionTransport>,
        sequencer: Arc<dyn SequencerGateway>,
        signer: Arc<dyn IdentitySigner>,
        notifier: Arc<dyn ParticipantNotifier>,
    ) -> Self {
        Self {
            validator: TransitionValidator::with_policy(config.signer_policy),
            notary,
            vault,
            transport,
            sequencer,
            signer,
            notifier,
        }
    }

    /// Run a proposal to a terminal phase.
    async fn execute(
        &self,
        mut run: ProposalRun,
    ) -> Result<FinalizedTransition, CoordinationError> {
        let proposal_id = run.signed().proposal.proposal_id;
        match self.drive(&mut run).await {
            Ok(finalized) => {
                info!(%proposal_id, position = %finalized.position, "proposal finalized");
                Ok(finalized)
            }
            Err(err) => {
                let reason = err.reason();
                warn!(%proposal_id, phase = %run.phase(), %reason, "proposal rejected");
                run.reject(reason);
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        run: &mut ProposalRun,
    ) -> Result<FinalizedTransition, CoordinationError> {
        // 1. Local validation, before any network I/O
        self.validator.validate(&run.signed().proposal)?;
        run.advance(ProposalPhase::LocallyVerified)?;

        // 2. Self-sign
        let own = self.signer.sign(&run.signed().proposal);
        run.attach(own);
        run.advance(ProposalPhase::SelfSigned)?;

        // 3. Collect counterparty approvals (skipped when there are none)
        if !run.counterparties().is_empty() {
            run.advance(ProposalPhase::CollectingApprovals)?;
            for party in run.counterparties().to_vec() {
                self.collect_from(run, party).await?;
            }
        }

        // 4. Completeness guard before touching the notary
        if let Some(party) = run.missing_signers().first().copied() {
            return Err(CoordinationError::SignatureMissing { party });
        }
        run.advance(ProposalPhase::FullyApproved)?;

        // 5. Submit to the notary; acceptance is the commit point
        let position = self.sequencer.submit(run.signed()).await?;
        run.advance(ProposalPhase::Sequenced)?;

        // 6. Broadcast to every participant
        let finalized = run.finalized(position);
        self.notifier
            .notify(&finalized.participants(), &finalized)
            .await?;
        run.advance(ProposalPhase::Finalized)?;

        Ok(finalized)
    }

    /// One counterparty round-trip: open a session, offer the proposal,
    /// await the verdict.
    async fn collect_from(
        &self,
        run: &mut ProposalRun,
        party: PartyId,
    ) -> Result<(), CoordinationError> {
        debug!(%party, "opening approval session");
        let mut session = self.transport.open(party).await?;

        session
            .send(SessionMessage::ProposalOffer {
                version: PROTOCOL_VERSION,
                proposal: run.signed().clone(),
            })
            .await?;

        match session.recv().await? {
            SessionMessage::ApprovalGranted { approval } => {
                let verified = approval.signer == party
                    && self
                        .signer
                        .verify(&approval, &run.signed().proposal, party);
                if !verified {
                    return Err(CoordinationError::SignatureMissing { party });
                }
                debug!(%party, "approval collected");
                run.attach(approval);
                Ok(())
            }
            SessionMessage::ApprovalDeclined { reason } => {
                Err(CoordinationError::Declined { party, reason })
            }
            other => Err(CoordinationError::Session(SessionError::UnexpectedMessage {
                expected: "ApprovalGranted",
                got: other.kind(),
            })),
        }
    }
}

#[async_trait]
impl TransferCoordinationApi for InitiatorService {
    async fn issue(&self, facts: AssetFacts) -> Result<FinalizedTransition, CoordinationError> {
        let me = self.signer.party_id();
        let output = AssetRecord::issued(facts, me, me);
        info!(address = %output.address, builder = %me, "issuing asset");

        let proposal = Proposal::new(Intent::Issue, vec![me], vec![], vec![output], self.notary);
        // The builder is the sole required signer; no sessions to open.
        let run = ProposalRun::new(proposal, BTreeSet::from([me]), vec![]);
        self.execute(run).await
    }

    async fn transfer(
        &self,
        address: &str,
        new_owner: PartyId,
    ) -> Result<FinalizedTransition, CoordinationError> {
        let me = self.signer.party_id();
        let unspent = self.vault.find_unspent(address).await?.ok_or_else(|| {
            CoordinationError::NotFound {
                address: address.to_string(),
            }
        })?;
        info!(
            address,
            owner = %unspent.record.owner,
            %new_owner,
            "transferring asset"
        );

        let output = unspent.record.transferred_to(new_owner);
        let policy = self.validator.policy();
        let required = policy.required_transfer_signers(&unspent.record, &output);
        let counterparties = policy.transfer_counterparties(me, &unspent.record, &output);

        // The proposal inherits the input's guarding notary.
        let notary = unspent.notary;
        let proposal = Proposal::new(
            Intent::Transfer,
            required.iter().copied().collect(),
            vec![unspent],
            vec![output],
            notary,
        );
        let run = ProposalRun::new(proposal, required, counterparties);
        self.execute(run).await
    }
}
