//! Port trait implementations for [`GithubClient`].

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use standards::{
    Baseline, BranchName, BranchProtection, BranchProtectionAdmin, GithubError,
    OrganizationDirectory, OrganizationName, ProtectionUpdate, RepositoryAdmin, RepositoryName,
    RepositoryRef, RepositorySnapshot, RequiredReviews, ReviewRequirementsUpdate,
};
use tracing::{debug, instrument};

use crate::client::GithubClient;
use crate::payloads::{
    EnabledFlag, ProtectionBody, ProtectionPayload, RepositoryListing, RepositoryPayload,
    ReviewRequirementsBody,
};

const PAGE_SIZE: usize = 100;

impl GithubClient {
    fn branch_url(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        rest: &[&str],
    ) -> Result<reqwest::Url, GithubError> {
        let mut segments = vec![
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "branches",
            branch.as_str(),
        ];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }
}

#[async_trait]
impl OrganizationDirectory for GithubClient {
    #[instrument(level = "debug", skip_all, fields(%org))]
    async fn list_repositories(
        &self,
        org: &OrganizationName,
    ) -> Result<Vec<RepositoryName>, GithubError> {
        let url = self.url(&["orgs", org.as_str(), "repos"])?;
        let mut names = Vec::new();
        let mut page = 1usize;
        loop {
            let query = [
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];
            let listing: Vec<RepositoryListing> = self.get_json(url.clone(), &query).await?;
            let fetched = listing.len();
            names.extend(listing.into_iter().filter_map(|r| RepositoryName::new(r.name)));
            if fetched < PAGE_SIZE {
                break;
            }
            page += 1;
        }
        debug!(count = names.len(), "Listed organization repositories");
        Ok(names)
    }
}

#[async_trait]
impl RepositoryAdmin for GithubClient {
    #[instrument(level = "debug", skip_all, fields(%repo))]
    async fn get_repository(
        &self,
        repo: &RepositoryRef,
    ) -> Result<RepositorySnapshot, GithubError> {
        let url = self.url(&["repos", repo.owner.as_str(), repo.name.as_str()])?;
        let payload: RepositoryPayload = self.get_json(url, &[]).await?;
        Ok(payload.into_snapshot(repo.clone()))
    }

    #[instrument(level = "debug", skip_all, fields(%repo))]
    async fn edit_repository(
        &self,
        repo: &RepositoryRef,
        baseline: &Baseline,
    ) -> Result<(), GithubError> {
        let url = self.url(&["repos", repo.owner.as_str(), repo.name.as_str()])?;
        let body = Value::Object(baseline.to_json_object());
        self.send_json(Method::PATCH, url, &body).await
    }

    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn branch_exists(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<bool, GithubError> {
        let url = self.branch_url(repo, branch, &[])?;
        match self.get_json::<Value>(url, &[]).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl BranchProtectionAdmin for GithubClient {
    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn get_protection(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<BranchProtection, GithubError> {
        let url = self.branch_url(repo, branch, &["protection"])?;
        let payload: ProtectionPayload = self.get_json(url, &[]).await?;
        Ok(payload.into())
    }

    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn put_protection(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        update: &ProtectionUpdate,
    ) -> Result<(), GithubError> {
        let url = self.branch_url(repo, branch, &["protection"])?;
        self.send_json(Method::PUT, url, &ProtectionBody::from(update))
            .await
    }

    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn get_required_reviews(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<RequiredReviews, GithubError> {
        let url = self.branch_url(
            repo,
            branch,
            &["protection", "required_pull_request_reviews"],
        )?;
        self.get_json(url, &[]).await
    }

    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn update_required_reviews(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        update: &ReviewRequirementsUpdate,
    ) -> Result<(), GithubError> {
        let url = self.branch_url(
            repo,
            branch,
            &["protection", "required_pull_request_reviews"],
        )?;
        self.send_json(Method::PATCH, url, &ReviewRequirementsBody::from(update))
            .await
    }

    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn get_required_signatures(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<bool, GithubError> {
        let url = self.branch_url(repo, branch, &["protection", "required_signatures"])?;
        let flag: EnabledFlag = self.get_json(url, &[]).await?;
        Ok(flag.enabled)
    }

    #[instrument(level = "debug", skip_all, fields(%repo, %branch))]
    async fn add_required_signatures(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<(), GithubError> {
        let url = self.branch_url(repo, branch, &["protection", "required_signatures"])?;
        self.send_empty(Method::POST, url).await
    }
}
