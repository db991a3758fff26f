//! The `must-use-result` rule.
//!
//! Flags call, `new` and `await` expressions whose type is a result
//! container (every protocol member present on some union part) and whose
//! value is never handled. A value is handled when, at the producing site
//! or at every read of the variable it is stored in, one of these holds:
//! - a terminal method is invoked on it, possibly after chain methods
//! - its success field is read, or a branch-only field is read under a
//!   discriminant check on the same variable
//! - it is returned from the enclosing function
//!
//! Each unhandled site yields one diagnostic, anchored at the site that
//! produced the value; reads that left it unhandled become related
//! information.

mod alias;
mod classifier;

use mustuse_binder::BinderState;
use mustuse_common::limits::MAX_ALIAS_CHAIN_DEPTH;
use mustuse_common::{Diagnostic, diagnostic_messages, format_message};
use mustuse_parser::{NodeArena, NodeIndex};
use mustuse_solver::RecursionGuard;
use mustuse_solver::recursion::RecursionProfile;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::error::CheckError;
use crate::navigator::{candidate_sites, is_awaited_call, is_ignored_parent};
use crate::node_types::TypeOracle;
use crate::options::MustUseResultOptions;

pub const RULE_NAME: &str = "must-use-result";

/// A read of a stored result that leaves it unhandled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnhandledRead {
    pub name: String,
    pub node: NodeIndex,
}

/// Outcome of classifying one occurrence of a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not a must-use value, or not judged in this position.
    NotApplicable,
    HandledDirect,
    HandledViaChain,
    HandledViaReturn,
    HandledViaFieldAccess,
    /// Stored in a variable and handled at every read.
    HandledViaAlias,
    /// Stored in a variable; these reads leave it unhandled.
    AliasedUnresolved(Vec<UnhandledRead>),
    Unhandled,
}

pub struct MustUseResult<'r> {
    arena: &'r NodeArena,
    binder: &'r BinderState,
    oracle: &'r dyn TypeOracle,
    options: &'r MustUseResultOptions,
    file_name: &'r str,
}

impl<'r> MustUseResult<'r> {
    /// Fails when no type information is available: the rule cannot tell a
    /// result from any other value without it.
    pub fn new(
        oracle: Option<&'r dyn TypeOracle>,
        arena: &'r NodeArena,
        binder: &'r BinderState,
        file_name: &'r str,
        options: &'r MustUseResultOptions,
    ) -> Result<Self, CheckError> {
        let oracle = oracle.ok_or(CheckError::TypesUnavailable)?;
        Ok(MustUseResult {
            arena,
            binder,
            oracle,
            options,
            file_name,
        })
    }

    /// Diagnostics for every unhandled candidate under `root`, in document
    /// order.
    pub fn check(&self, root: NodeIndex) -> Vec<Diagnostic> {
        let mut reported = FxHashSet::default();
        let mut diagnostics = Vec::new();
        for site in candidate_sites(self.arena, root) {
            if let Some(diagnostic) = self.check_site(site, &mut reported) {
                diagnostics.push(diagnostic);
            }
        }
        debug!(
            file = %self.file_name,
            findings = diagnostics.len(),
            "must-use-result done"
        );
        diagnostics
    }

    fn check_site(&self, site: NodeIndex, reported: &mut FxHashSet<NodeIndex>) -> Option<Diagnostic> {
        if is_awaited_call(self.arena, site) {
            return None;
        }
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Custom {
            max_depth: MAX_ALIAS_CHAIN_DEPTH,
            max_iterations: MAX_ALIAS_CHAIN_DEPTH * 64,
        });
        let verdict = self.classify(site, &mut guard);
        trace!(site = site.0, ?verdict, "classified");
        let reads = match verdict {
            Verdict::Unhandled => Vec::new(),
            Verdict::AliasedUnresolved(reads) => reads,
            _ => return None,
        };
        if !reported.insert(site) {
            return None;
        }
        Some(self.report(site, &reads))
    }

    /// Verdict for one occurrence: the producing site itself, or a read of
    /// the variable it was stored in.
    pub fn classify(&self, node: NodeIndex, guard: &mut RecursionGuard<NodeIndex>) -> Verdict {
        if is_ignored_parent(self.arena, node) {
            return Verdict::NotApplicable;
        }
        let protocol = &self.options.protocol_members;
        if !self.oracle.is_must_use(node, protocol) {
            return Verdict::NotApplicable;
        }
        if let Some(handled) = classifier::method_handling(self.arena, self.options, node) {
            return handled;
        }
        if classifier::is_field_access_handled(self.arena, self.options, node)
            || classifier::is_guarded_field_access(self.arena, self.binder, self.options, node)
        {
            return Verdict::HandledViaFieldAccess;
        }
        if classifier::is_propagated(self.arena, node) {
            return Verdict::HandledViaReturn;
        }

        let Some(binding) = alias::resolve_assignment(self.arena, self.binder, self.oracle, protocol, node)
        else {
            return Verdict::Unhandled;
        };
        let reads = alias::all_reads(self.binder, &binding);
        if reads.is_empty() {
            return Verdict::Unhandled;
        }

        debug!(
            variable = %binding.name,
            reads = reads.len(),
            "following stored result"
        );
        let mut unhandled = Vec::new();
        for read in reads {
            let entered = guard.enter(read);
            if !entered.is_entered() {
                trace!(read = read.0, ?entered, "alias walk stopped");
                unhandled.push(UnhandledRead {
                    name: binding.name.clone(),
                    node: read,
                });
                continue;
            }
            let verdict = self.classify(read, guard);
            guard.leave(read);
            match verdict {
                Verdict::Unhandled => unhandled.push(UnhandledRead {
                    name: binding.name.clone(),
                    node: read,
                }),
                Verdict::AliasedUnresolved(nested) => unhandled.extend(nested),
                _ => {}
            }
        }
        if unhandled.is_empty() {
            Verdict::HandledViaAlias
        } else {
            Verdict::AliasedUnresolved(unhandled)
        }
    }

    fn report(&self, site: NodeIndex, reads: &[UnhandledRead]) -> Diagnostic {
        let (start, length) = self.span_of(site);
        let mut diagnostic = Diagnostic::from_message(
            self.file_name,
            start,
            length,
            &diagnostic_messages::MUST_USE_RESULT,
            &[],
        );
        for read in reads {
            let (read_start, read_length) = self.span_of(read.node);
            let message = format_message(
                diagnostic_messages::RESULT_LEFT_UNHANDLED_HERE.message,
                &[&read.name],
            );
            diagnostic = diagnostic.with_related(self.file_name, read_start, read_length, message);
        }
        debug!(
            file = %self.file_name,
            start,
            unhandled_reads = reads.len(),
            "unhandled result"
        );
        diagnostic
    }

    fn span_of(&self, node: NodeIndex) -> (u32, u32) {
        self.arena
            .get(node)
            .map_or((0, 0), |node| (node.pos, node.end.saturating_sub(node.pos)))
    }
}
