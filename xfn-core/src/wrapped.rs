//! Wrapped function sets
//!
//! `xfn` turns a configuration and a target into a `Wrapped` tree. Each node
//! is an entry point with its own pipeline; children are the named variants
//! (`root.all`, `root.test`, `root.test.all`, ...).

use crate::args::{self, Args};
use crate::config::{Config, Sugar};
use crate::error::Result;
use crate::pipeline::{ArgEditor, Pipeline, ReturnEditor};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Function shared by every entry point of a wrapped set
pub type Target<E> = Arc<dyn Fn(Args) -> std::result::Result<Value, E> + Send + Sync>;

/// An entry point into a wrapped target, plus its named children
pub struct Wrapped<E> {
    target: Target<E>,
    pipeline: Pipeline,
    sugar: Sugar,
    props: BTreeMap<String, Wrapped<E>>,
}

impl<E> Wrapped<E> {
    fn node(target: &Target<E>, pipeline: Pipeline, sugar: Sugar) -> Self {
        Self {
            target: Arc::clone(target),
            pipeline,
            sugar,
            props: BTreeMap::new(),
        }
    }

    /// Call the target through this entry point
    pub fn call(&self, args: Args) -> std::result::Result<Value, E> {
        trace!(args = args.len(), "calling wrapped target");
        self.pipeline.run(|args| (self.target)(args), args)
    }

    /// Call with an explicit receiver
    ///
    /// With receiver binding enabled the receiver becomes the argument at the
    /// configured position before any other editing happens. With binding
    /// disabled it is dropped.
    pub fn call_with(&self, receiver: Value, args: Args) -> std::result::Result<Value, E> {
        match self.sugar {
            Sugar::Receiver { arg } => {
                trace!(position = arg, "binding receiver");
                self.call(args::insert_arg(args, arg, receiver))
            }
            Sugar::Disabled => {
                trace!("receiver binding disabled, dropping receiver");
                self.call(args)
            }
        }
    }

    /// Editors applied by this entry point
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Receiver binding used by `call_with`
    pub fn sugar(&self) -> Sugar {
        self.sugar
    }

    /// Named child entry point
    pub fn prop(&self, name: &str) -> Option<&Wrapped<E>> {
        self.props.get(name)
    }

    /// Nested child entry point, e.g. `&["test", "all"]`
    pub fn path(&self, names: &[&str]) -> Option<&Wrapped<E>> {
        names.iter().try_fold(self, |node, name| node.prop(name))
    }

    /// Names of the direct children, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    fn attach(&mut self, name: &str, child: Wrapped<E>) {
        debug!(
            entry = %name,
            arg_editors = ?child.pipeline.arg_editors(),
            return_editors = ?child.pipeline.return_editors(),
            "attached entry point"
        );
        if self.props.insert(name.to_string(), child).is_some() {
            warn!(entry = %name, "entry point replaced by a later definition");
        }
    }
}

impl<E> Clone for Wrapped<E> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            pipeline: self.pipeline.clone(),
            sugar: self.sugar,
            props: self.props.clone(),
        }
    }
}

impl<E> fmt::Debug for Wrapped<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("pipeline", &self.pipeline)
            .field("sugar", &self.sugar)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

impl<'a, E> Index<&'a str> for Wrapped<E> {
    type Output = Wrapped<E>;

    /// Panics if there is no child named `name`; use [`Wrapped::prop`] to check.
    fn index(&self, name: &'a str) -> &Wrapped<E> {
        match self.prop(name) {
            Some(child) => child,
            None => panic!("no entry point named `{name}`"),
        }
    }
}

/// Wrap `target` according to `config`
///
/// Configuration errors are reported here, never at call time.
pub fn xfn<F, E>(config: &Config, target: F) -> Result<Wrapped<E>>
where
    F: Fn(Args) -> std::result::Result<Value, E> + Send + Sync + 'static,
    E: 'static,
{
    let positions = config.positions()?;
    debug!(?positions, sugar = ?config.sbo, "building wrapped function set");

    let target: Target<E> = Arc::new(target);
    let node = |pipeline| Wrapped::node(&target, pipeline, config.sbo);
    let un_collect = config.plural_return.then_some(ReturnEditor::UnCollect);
    let plural = config.plural_name().zip(positions.plural);

    let mut root = match plural {
        Some((name, index)) => {
            let mut root = node(
                Pipeline::new()
                    .arg(ArgEditor::Pluralize { index })
                    .maybe_returns(un_collect),
            );
            root.attach(name, node(Pipeline::new().arg(ArgEditor::Arrify { index })));
            root
        }
        None => node(Pipeline::new()),
    };

    if let (Some(presets), Some(option_index)) = (&config.option_props, positions.option) {
        for (name, preset) in presets {
            let inject = ArgEditor::inject(option_index, preset.clone());
            let Some((plural_name, plural_index)) = plural else {
                root.attach(name, node(Pipeline::new().arg(inject)));
                continue;
            };

            root.attach(
                name,
                node(
                    Pipeline::new()
                        .arg(ArgEditor::Pluralize {
                            index: plural_index,
                        })
                        .arg(inject.clone())
                        .maybe_returns(un_collect),
                ),
            );

            let (outer, inner) = if config.plural_first {
                (plural_name, name.as_str())
            } else {
                (name.as_str(), plural_name)
            };
            let nested = node(
                Pipeline::new()
                    .arg(ArgEditor::Arrify {
                        index: plural_index,
                    })
                    .arg(inject),
            );
            if let Some(parent) = root.props.get_mut(outer) {
                parent.attach(inner, nested);
            }
        }
    }

    Ok(root)
}
