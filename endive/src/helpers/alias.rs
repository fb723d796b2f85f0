//! `Define name, object` and alias expansion around every other directive

use super::{expect_arity, History, HookFlow, Registry, StatefulHelper, ALL};
use crate::object::Object;
use crate::state::alias::{collapse, AliasState};
use crate::state::Step;
use crate::{EndiveResult, Outcome};

pub struct AliasHelper {
    registry: Registry<Self>,
    history: History<AliasState>,
}

impl Default for AliasHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasHelper {
    pub fn new() -> Self {
        let registry = Registry::<Self>::new()
            .hook(&["Define"], Self::define_forhook, Some(Self::all_backhook))
            .hook(&[ALL], Self::all_forhook, Some(Self::all_backhook))
            .handler("Define", Self::handle_define);
        Self {
            registry,
            history: History::default(),
        }
    }

    /// Expand aliases inside the definition, never in the name being defined
    fn define_forhook(&mut self, directive: &str, arguments: Vec<Object>) -> EndiveResult<HookFlow> {
        expect_arity(directive, &arguments, 2..=2)?;
        let state = self.state();
        Ok(HookFlow::Continue(vec![
            arguments[0].clone(),
            state.expand(&arguments[1]),
        ]))
    }

    fn all_forhook(&mut self, _directive: &str, arguments: Vec<Object>) -> EndiveResult<HookFlow> {
        let state = self.state();
        Ok(HookFlow::Continue(
            arguments.iter().map(|arg| state.expand(arg)).collect(),
        ))
    }

    fn all_backhook(&mut self, _directive: &str, results: Vec<Object>) -> Vec<Object> {
        results.iter().map(collapse).collect()
    }

    fn handle_define(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 2..=2)?;
        let (name, definition) = (&arguments[0], &arguments[1]);
        let Some(alias) = name.name().filter(|_| name.is_atom()) else {
            return Ok(Outcome::failure(vec![
                name.with_result("Alias name [] must be a plain name")
            ]));
        };

        let next = self.state().defined(alias, definition.clone());
        let result = Object::atom(alias).with_result("[] defined");
        Ok(self.commit(Step::next(next, result)))
    }
}

impl StatefulHelper for AliasHelper {
    type State = AliasState;

    const NAME: &'static str = "alias";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn history(&self) -> &History<AliasState> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<AliasState> {
        &mut self.history
    }
}
