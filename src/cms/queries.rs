//! GROQ queries for each content type

pub const BLOG_POSTS: &str = r#"*[_type == "blogPost"] | order(publishedAt desc) {
  _id,
  _updatedAt,
  title,
  slug,
  excerpt,
  publishedAt,
  tags,
  featured,
  coverImage,
  readingTime,
  "content": content[0...3]
}"#;

pub const BLOG_POST: &str = r#"*[_type == "blogPost" && slug.current == $slug][0] {
  _id,
  _updatedAt,
  title,
  slug,
  excerpt,
  content,
  publishedAt,
  tags,
  featured,
  coverImage,
  readingTime
}"#;

pub const FEATURED_BLOG_POSTS: &str = r#"*[_type == "blogPost" && featured == true] | order(publishedAt desc) [0...3] {
  _id,
  _updatedAt,
  title,
  slug,
  excerpt,
  publishedAt,
  tags,
  featured,
  coverImage,
  readingTime
}"#;

pub const PROJECTS: &str = r#"*[_type == "project"] | order(featured desc, sortOrder asc) {
  _id,
  title,
  slug,
  description,
  image,
  technologies,
  category,
  status,
  featured,
  liveUrl,
  githubUrl,
  startDate,
  endDate,
  role,
  sortOrder
}"#;

pub const PROJECT: &str = r#"*[_type == "project" && slug.current == $slug][0] {
  _id,
  title,
  slug,
  description,
  longDescription,
  image,
  technologies,
  category,
  status,
  featured,
  liveUrl,
  githubUrl,
  startDate,
  endDate,
  teamSize,
  role,
  sortOrder
}"#;

pub const FEATURED_PROJECTS: &str = r#"*[_type == "project" && featured == true] | order(sortOrder asc) {
  _id,
  title,
  slug,
  description,
  image,
  technologies,
  category,
  status,
  featured,
  liveUrl,
  githubUrl,
  startDate,
  endDate,
  role
}"#;

pub const TOY_PROJECTS: &str = r#"*[_type == "toyProject"] | order(featured desc, sortOrder asc) {
  _id,
  title,
  slug,
  description,
  image,
  url,
  technologies,
  category,
  createdAt,
  featured,
  sortOrder
}"#;

pub const EXPERIENCE: &str = r#"*[_type == "experience"] | order(startDate desc) {
  _id,
  title,
  company,
  location,
  type,
  description,
  startDate,
  endDate,
  current,
  skills,
  achievements,
  companyUrl,
  sortOrder
}"#;

pub const EDUCATION: &str = r#"*[_type == "education"] | order(startDate desc) {
  _id,
  degree,
  field,
  institution,
  location,
  description,
  gpa,
  honors,
  activities,
  relevantCourses,
  startDate,
  endDate,
  current,
  institutionUrl,
  sortOrder
}"#;

pub const SKILLS: &str = r#"*[_type == "skill"] | order(category asc, proficiencyScore desc) {
  _id,
  name,
  category,
  proficiency,
  proficiencyScore,
  description,
  yearsOfExperience,
  certifications,
  projects,
  icon,
  featured,
  sortOrder
}"#;

/// Grouping by category happens client-side; GROQ has no group operator
pub const SKILLS_BY_CATEGORY: &str = r#"*[_type == "skill"] | order(proficiencyScore desc) {
  _id,
  name,
  category,
  proficiency,
  proficiencyScore,
  description,
  yearsOfExperience,
  icon,
  featured
}"#;

pub const SITE_SETTINGS: &str = r#"*[_type == "siteSettings"][0] {
  _id,
  siteTitle,
  siteDescription,
  siteKeywords,
  ogImage,
  favicon,
  author,
  socialLinks,
  contact,
  navigation,
  theme,
  analytics,
  updatedAt
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_item_queries_take_slug() {
        for query in [BLOG_POST, PROJECT] {
            assert!(query.contains("$slug"));
            assert!(query.contains("[0]"));
        }
        for query in [BLOG_POSTS, PROJECTS, TOY_PROJECTS, SKILLS, SITE_SETTINGS] {
            assert!(!query.contains("$slug"));
        }
    }

    #[test]
    fn test_post_queries_project_featured() {
        for query in [BLOG_POSTS, BLOG_POST, FEATURED_BLOG_POSTS] {
            let projection = &query[query.rfind('{').unwrap()..];
            assert!(
                projection.lines().any(|l| l.trim().trim_end_matches(',') == "featured"),
                "missing featured in {}",
                query
            );
        }
    }
}
