use std::path::{Path, PathBuf};

use itertools::Itertools;
use structopt::StructOpt;

use crate::{
    binding::InjectBindingRegistry,
    errors::{Report, StilettoError, StilettoResult},
    graph::BindingGraph,
    manifest::{self, Declarations},
    resolve::BindingGraphFactory,
    validation::{self, ValidationOptions},
};

#[derive(Debug, Default, StructOpt)]
pub struct ResolveOptions {
    #[structopt(name = "MANIFEST", help = "component manifest (JSON)", parse(from_os_str))]
    pub manifest: PathBuf,

    #[structopt(long, help = "Only resolve the named top-level component")]
    pub component: Option<String>,

    #[structopt(long, help = "Print a JSON summary instead of a tree")]
    pub json: bool,
}

#[derive(Debug, Default, StructOpt)]
pub struct CheckOptions {
    #[structopt(name = "MANIFEST", help = "component manifest (JSON)", parse(from_os_str))]
    pub manifest: PathBuf,

    #[structopt(long, help = "Only check the named top-level component")]
    pub component: Option<String>,

    #[structopt(
        long = "aot",
        help = "Treat subcomponents as generated ahead of time; missing bindings there become abstract accessors"
    )]
    pub ahead_of_time_subcomponents: bool,
}

#[derive(Debug, Default)]
pub struct Driver {
    pub errors_emitted: usize,
}

impl Driver {
    pub fn new() -> Driver {
        Driver::default()
    }

    pub fn emit_errors(&mut self, errs: Vec<StilettoError>) {
        for ((kind, src), group) in &errs.into_iter().group_by(|err| (err.kind, err.src.clone())) {
            let msg = group.map(|err| err.msg).collect::<Vec<_>>().join("\n");
            let err = StilettoError { msg, src, kind };
            err.emit();
            self.errors_emitted += 1;
        }
    }

    pub fn emit_report(&mut self, report: &Report) {
        report.emit();
        self.errors_emitted += report.error_count();
    }

    pub fn load(&self, path: &Path) -> StilettoResult<Declarations> {
        manifest::load(path)
    }

    /// Resolves every top-level component, or only `component` when given.
    pub fn resolve(
        &self,
        decls: &Declarations,
        component: Option<&str>,
    ) -> Result<Vec<BindingGraph>, Vec<StilettoError>> {
        let roots = match component {
            Some(name) => match decls.component(name) {
                Some(c) => vec![c.clone()],
                None => {
                    return Err(vec![StilettoError::manifest(format!(
                        "no top-level component named `{}`",
                        name
                    ))])
                }
            },
            None => decls.components.clone(),
        };

        let registry: &dyn InjectBindingRegistry = &decls.registry;
        let factory = BindingGraphFactory::new(registry);
        Ok(roots.into_iter().map(|root| factory.create(root)).collect())
    }

    pub fn resolve_manifest(&self, options: &ResolveOptions) -> Result<Vec<BindingGraph>, Vec<StilettoError>> {
        let decls = self.load(&options.manifest)?;
        self.resolve(&decls, options.component.as_deref())
    }

    /// Resolves and validates, returning one report for all components.
    /// Flags on the command line win over the manifest's options.
    pub fn check(&self, options: &CheckOptions) -> Result<Report, Vec<StilettoError>> {
        let decls = self.load(&options.manifest)?;
        let validation = ValidationOptions {
            ahead_of_time_subcomponents: options.ahead_of_time_subcomponents
                || decls.options.ahead_of_time_subcomponents,
        };

        let mut report = Report::new();
        for graph in self.resolve(&decls, options.component.as_deref())? {
            report.extend(validation::validate(&graph, validation).diagnostics().iter().cloned());
        }
        Ok(report)
    }
}
