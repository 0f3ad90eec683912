//! Token-stream printer: one documented function per variant, building an
//! `EsQuery` through the configured query-builder module, plus the typed
//! document model of the index.

use convert_case::{Case, Casing};
use esforge_core::{Error, MetricKind, ParamType, Result};
use esforge_schema::{FieldCatalog, FieldShape, ModelType};
use esforge_synth::{
    AggKind, AggNode, BoolNode, Bound, FamilyOutput, Leaf, QueryBody, QueryRoot, SizeSpec,
    Variant,
};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::Path;
use tracing::debug;

pub const DEFAULT_BUILDER_PATH: &str = "eq";

#[derive(Debug, Clone)]
pub struct Printer {
    builder: Path,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            builder: syn::parse_quote!(eq),
        }
    }
}

impl Printer {
    /// Printer targeting the builder module at `builder_path`, e.g. `crate::es::eq`.
    pub fn new(builder_path: &str) -> Result<Self> {
        let builder = syn::parse_str::<Path>(builder_path)
            .map_err(|e| Error::Config(format!("invalid builder path `{}`: {}", builder_path, e)))?;
        Ok(Self { builder })
    }

    /// Rendered source for every variant of a family.
    pub fn render_family(&self, output: &FamilyOutput) -> Result<String> {
        let mut out = format!(
            "// Generated by esforge for index `{}`, family `{}`.\n",
            output.index, output.family
        );
        for variant in &output.variants {
            out.push('\n');
            out.push_str(&self.render_variant(variant)?.to_string());
            out.push('\n');
        }
        debug!(
            "Rendered {} functions for {}",
            output.variants.len(),
            output.family
        );
        Ok(out)
    }

    /// Rendered document model: one serde struct per object/nested level.
    pub fn render_model(&self, catalog: &FieldCatalog) -> Result<String> {
        let model = catalog.model();
        let mut out = format!(
            "// Generated by esforge for index `{}`, document model.\n",
            catalog.index
        );
        for ty in &model.types {
            out.push('\n');
            out.push_str(&model_type(ty)?.to_string());
            out.push('\n');
        }
        debug!("Rendered {} model types for {}", model.len(), catalog.index);
        Ok(out)
    }

    pub fn render_variant(&self, variant: &Variant) -> Result<TokenStream> {
        let name = ident(&variant.identifier.to_case(Case::Snake))?;
        let eq = &self.builder;

        let docs = variant.doc.lines().map(|line| format!(" {}", line));

        let mut args = Vec::with_capacity(variant.params.len());
        for group in variant.params.declarations() {
            let ty = rust_type(group.ty);
            for param in &group.names {
                let param = ident(param)?;
                args.push(quote!(#param: #ty));
            }
        }

        let body = self.query(&variant.query)?;

        Ok(quote! {
            #(#[doc = #docs])*
            pub fn #name(#(#args),*) -> #eq::EsQuery {
                #body
            }
        })
    }

    fn query(&self, query: &QueryBody) -> Result<TokenStream> {
        let eq = &self.builder;
        let root = self.root(&query.root)?;
        let mut chain = quote!(#eq::EsQuery::default().query(#root));

        if let Some(node) = &query.aggregation {
            let agg = self.aggregation(node)?;
            chain.extend(quote!(.agg(#agg)));
        }
        if let Some(sort) = &query.sort {
            let path = &sort.path;
            let order = sort.direction.order();
            chain.extend(quote!(.sort(#eq::sort(#path, #order))));
        }
        match &query.size {
            Some(SizeSpec::Param { param }) => {
                let param = ident(param)?;
                chain.extend(quote!(.size(#param)));
            }
            Some(SizeSpec::Fixed { value }) => chain.extend(quote!(.size(#value))),
            None => {}
        }
        Ok(chain)
    }

    fn root(&self, root: &QueryRoot) -> Result<TokenStream> {
        let eq = &self.builder;
        Ok(match root {
            QueryRoot::MatchAll => quote!(#eq::match_all()),
            QueryRoot::Bool(node) => self.bool_node(node)?,
            QueryRoot::Knn {
                path,
                param,
                filter,
            } => {
                let param = ident(param)?;
                let filter = match filter {
                    Some(node) => {
                        let node = self.bool_node(node)?;
                        quote!(Some(#node))
                    }
                    None => quote!(None),
                };
                quote!(#eq::knn(#path, #param, #filter))
            }
        })
    }

    fn bool_node(&self, node: &BoolNode) -> Result<TokenStream> {
        let eq = &self.builder;
        let mut clauses = Vec::new();
        for (leaves, with) in [
            (&node.must, quote!(with_must)),
            (&node.filter, quote!(with_filter)),
            (&node.should, quote!(with_should)),
        ] {
            if leaves.is_empty() {
                continue;
            }
            let leaves = leaves
                .iter()
                .map(|leaf| self.leaf(leaf))
                .collect::<Result<Vec<_>>>()?;
            clauses.push(quote!(#eq::#with(vec![#(#leaves),*])));
        }
        Ok(quote!(#eq::bool([#(#clauses),*])))
    }

    fn leaf(&self, leaf: &Leaf) -> Result<TokenStream> {
        let eq = &self.builder;
        Ok(match leaf {
            Leaf::Match { path, param } => {
                let param = ident(param)?;
                quote!(#eq::r#match(#path, #param))
            }
            Leaf::Term { path, param } => {
                let param = ident(param)?;
                quote!(#eq::term(#path, #param))
            }
            Leaf::Range {
                path,
                gte,
                gt,
                lt,
                lte,
            } => {
                let bounds = [gte, gt, lt, lte]
                    .into_iter()
                    .map(|b| bound(b.as_ref()))
                    .collect::<Result<Vec<_>>>()?;
                quote!(#eq::range(#path, #(#bounds),*))
            }
        })
    }

    fn aggregation(&self, node: &AggNode) -> Result<TokenStream> {
        let eq = &self.builder;
        let path = &node.path;
        let mut agg = match &node.kind {
            AggKind::Terms => quote!(#eq::terms_agg(#path)),
            AggKind::Metric { metric } => {
                let builder = metric_builder(*metric);
                quote!(#eq::#builder(#path))
            }
            AggKind::Histogram { interval_param } => {
                let interval = ident(interval_param)?;
                quote!(#eq::histogram_agg(#path, #interval))
            }
            AggKind::DateHistogram { unit } => {
                let interval = unit.interval();
                quote!(#eq::date_histogram_agg(#path, #interval))
            }
        };
        if let Some(sub) = &node.sub {
            let sub = self.aggregation(sub)?;
            agg.extend(quote!(.nested(#sub)));
        }
        Ok(agg)
    }
}

fn bound(bound: Option<&Bound>) -> Result<TokenStream> {
    Ok(match bound {
        None => quote!(None),
        Some(Bound::Param { param }) => {
            let param = ident(param)?;
            quote!(Some(#param.into()))
        }
        Some(Bound::Recent { window, param }) => {
            let param = ident(param)?;
            let template = window.literal_format().replacen("%d", "{}", 1);
            quote!(Some(format!(#template, #param).into()))
        }
    })
}

fn model_type(ty: &ModelType) -> Result<TokenStream> {
    let name = ident(&ty.name)?;
    let doc = format!(" {}", ty.comment);

    let mut fields = Vec::with_capacity(ty.fields.len());
    for field in &ty.fields {
        let rust_name = ident(&field.rust_name)?;
        let field_ty = match &field.shape {
            FieldShape::Scalar { ty } => rust_type(*ty),
            FieldShape::Object { type_name } => {
                let nested = ident(type_name)?;
                quote!(Option<Box<#nested>>)
            }
            FieldShape::List { type_name } => {
                let nested = ident(type_name)?;
                quote!(Vec<#nested>)
            }
        };
        let doc = if field.raw_type.is_empty() {
            format!(" {}", field.comment)
        } else {
            format!(" {} (`{}`)", field.comment, field.raw_type)
        };
        let json_name = &field.json_name;
        let rename = (field.rust_name != field.json_name)
            .then(|| quote!(#[serde(rename = #json_name)]));
        fields.push(quote! {
            #[doc = #doc]
            #rename
            pub #rust_name: #field_ty
        });
    }

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct #name {
            #(#fields),*
        }
    })
}

fn metric_builder(metric: MetricKind) -> Ident {
    let name = match metric {
        MetricKind::Avg => "avg_agg",
        MetricKind::Sum => "sum_agg",
        MetricKind::Min => "min_agg",
        MetricKind::Max => "max_agg",
        MetricKind::Stats => "stats_agg",
    };
    Ident::new(name, Span::call_site())
}

fn rust_type(ty: ParamType) -> TokenStream {
    match ty {
        ParamType::Str | ParamType::Date => quote!(String),
        ParamType::I64 => quote!(i64),
        ParamType::F64 => quote!(f64),
        ParamType::Bool => quote!(bool),
        ParamType::Vector => quote!(Vec<f32>),
        ParamType::Json => quote!(serde_json::Value),
    }
}

/// Identifier token, escaped as a raw identifier when it collides with a keyword.
fn ident(name: &str) -> Result<Ident> {
    if syn::parse_str::<Ident>(name).is_ok() {
        return Ok(Ident::new(name, Span::call_site()));
    }
    let raw_ok = !matches!(name, "" | "_" | "self" | "Self" | "super" | "crate")
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if raw_ok {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        Err(Error::Contract(format!("`{}` cannot be a Rust identifier", name)))
    }
}
