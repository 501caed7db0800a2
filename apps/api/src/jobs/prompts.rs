/// Prompt asking for the skills and requirements a job description names.
pub fn build_skill_extraction_prompt(job_description: &str) -> String {
    format!(
        "Extract the technical skills, tools and requirements from this job description.\n\
         Return each one on its own line, using its common short name (e.g. \"Python\", \"Kubernetes\").\n\
         \n\
         JOB DESCRIPTION:\n\
         {job_description}"
    )
}
