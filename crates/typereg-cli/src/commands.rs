//! Command execution against an in-memory repository.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use typereg_core::{
    CallContext, InMemoryDirectory, InMemoryObjectStore, Paging, RepositoryInfo,
    RepositoryTypeService, TypeCandidate,
};

use crate::config::{Args, Command};
use crate::error::Error;

/// Read a JSON array of type candidates.
pub fn load_candidates(path: &Path) -> Result<Vec<TypeCandidate>, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Build the repository described by `args` and run its command.
pub fn run(args: &Args) -> Result<Value, Error> {
    let config = args.registry_config()?;

    let directory = Arc::new(InMemoryDirectory::new());
    directory.register(RepositoryInfo::new(args.repository.as_str()));
    let service = RepositoryTypeService::new(directory, config);
    service.attach_repository(&args.repository, Arc::new(InMemoryObjectStore::new()))?;

    let ctx = CallContext::admin();
    if let Some(path) = &args.types {
        let candidates = load_candidates(path)?;
        let count = candidates.len();
        for candidate in candidates {
            service.create_type(&ctx, &args.repository, candidate)?;
        }
        info!(path = %path.display(), count, "type definitions loaded");
    }

    let repo = args.repository.as_str();
    let value = match &args.command {
        Command::Children {
            type_id,
            skip,
            max_items,
            include_properties,
        } => {
            let paging = Paging {
                skip: *skip,
                max_items: *max_items,
            };
            let list = service.get_type_children(
                &ctx,
                repo,
                type_id.as_deref(),
                *include_properties,
                paging,
            )?;
            serde_json::to_value(list)?
        }
        Command::Descendants {
            type_id,
            depth,
            include_properties,
        } => {
            let forest = service.get_type_descendants(
                &ctx,
                repo,
                type_id.as_deref(),
                *depth,
                *include_properties,
            )?;
            serde_json::to_value(forest)?
        }
        Command::Show { type_id } => {
            serde_json::to_value(service.get_type_definition(&ctx, repo, type_id)?)?
        }
        Command::Repositories => serde_json::to_value(service.repository_infos(&ctx)?)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use typereg_core::ErrorKind;

    fn types_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id":"custom:invoice","baseKind":"document","parentId":"cmis:document",
                  "propertyDefinitions":[{{"id":"amount","propertyType":"decimal"}}]}},
                {{"id":"custom:vatInvoice","baseKind":"document","parentId":"custom:invoice"}}
            ]"#
        )
        .unwrap();
        file
    }

    fn args(file: &tempfile::NamedTempFile, rest: &[&str]) -> Args {
        let path = file.path().to_str().unwrap();
        let mut argv = vec!["typereg", "--types", path];
        argv.extend_from_slice(rest);
        Args::parse_from(argv)
    }

    #[test]
    fn test_children_of_document() {
        let file = types_file();
        let value = run(&args(&file, &["children", "cmis:document"])).unwrap();
        assert_eq!(value["numItems"], 1);
        assert_eq!(value["hasMoreItems"], false);
        assert_eq!(value["items"][0]["id"], "custom:invoice");
        assert!(value["items"][0].get("propertyDefinitions").is_none());
    }

    #[test]
    fn test_descendants_tree() {
        let file = types_file();
        let value = run(&args(&file, &["descendants", "cmis:document", "--depth", "-1"])).unwrap();
        assert_eq!(value[0]["typeDefinition"]["id"], "custom:invoice");
        assert_eq!(value[0]["children"][0]["typeDefinition"]["id"], "custom:vatInvoice");
    }

    #[test]
    fn test_show_with_properties() {
        let file = types_file();
        let value = run(&args(&file, &["show", "custom:vatInvoice"])).unwrap();
        let props = value["propertyDefinitions"].as_array().unwrap();
        assert!(props.iter().any(|p| p["id"] == "amount" && p["inherited"] == true));
    }

    #[test]
    fn test_depth_zero_rejected() {
        let file = types_file();
        let err = run(&args(&file, &["descendants", "--depth", "0"])).unwrap_err();
        match err {
            Error::Registry(e) => assert_eq!(e.kind(), ErrorKind::InvalidArgument),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_types_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("types.json");
        let argv = ["typereg", "--types", missing.to_str().unwrap(), "repositories"];
        assert!(matches!(run(&Args::parse_from(argv)), Err(Error::Read { .. })));
    }
}
